//! Route info reconciliation.
//!
//! The live side brings arrival estimates and predictions, the static side
//! brings canonical names, frequency, and stop order. Stop sequences are
//! reconciled stop-by-stop (live feeds qualify some stop ids with
//! `_`-suffixes), rotated to start at the static route's first stop, then
//! sorted with the injected comparator.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::config::{SameStopFn, StopOrderFn};
use crate::models::types::{RouteInfo, StopOnRoute};
use crate::reconcile::upcoming::flag_upcoming_stops;

/// Ambient inputs of a route merge: the merge's wall-clock time plus the
/// injected stop-identity and stop-order behaviors.
pub struct RouteMergeContext<'a> {
    pub now: DateTime<Utc>,
    pub max_arrival_delay: Duration,
    pub same_stop: &'a SameStopFn,
    pub stop_order: &'a StopOrderFn,
}

/// Merges one route's live and static results into the served view.
///
/// Whatever survives gets its upcoming flags computed and its
/// `last_update` stamped with the merge time.
pub fn merge_route_info(
    live: Option<RouteInfo>,
    static_info: Option<RouteInfo>,
    ctx: &RouteMergeContext<'_>,
) -> Option<RouteInfo> {
    let mut merged = match (live, static_info) {
        (None, None) => return None,
        (Some(mut live), None) => {
            live.live = true;
            live
        }
        (None, Some(static_info)) => static_info,
        (Some(mut live), Some(static_info)) => {
            live.live = true;
            overlay_static(live, static_info, ctx)
        }
    };

    flag_upcoming_stops(&mut merged.stops, ctx.now, ctx.max_arrival_delay, ctx.same_stop);
    merged.last_update = Some(ctx.now);
    Some(merged)
}

fn overlay_static(
    mut live: RouteInfo,
    static_info: RouteInfo,
    ctx: &RouteMergeContext<'_>,
) -> RouteInfo {
    // Static descriptive fields are better when present
    if !static_info.name.is_empty() {
        live.name = static_info.name.clone();
    }
    if !static_info.description.is_empty() {
        live.description = static_info.description.clone();
    }
    if static_info.frequency != 0 {
        live.frequency = static_info.frequency;
    }

    if live.stops.is_empty() {
        live.stops = static_info.stops;
    } else {
        reconcile_stops(&mut live.stops, &static_info.stops, ctx);
    }

    live
}

fn reconcile_stops(
    live_stops: &mut Vec<StopOnRoute>,
    static_stops: &[StopOnRoute],
    ctx: &RouteMergeContext<'_>,
) {
    let static_index: HashMap<&str, &StopOnRoute> = static_stops
        .iter()
        .map(|stop| (stop.id.as_str(), stop))
        .collect();

    for stop in live_stops.iter_mut() {
        // Exact match first; live feeds qualify some ids (NextBus appends
        // _ar), so strip one trailing qualifier and retry
        let static_entry = static_index.get(stop.id.as_str()).copied().or_else(|| {
            let base = stop.id.as_str().split('_').next().unwrap_or(stop.id.as_str());
            static_index.get(base).copied()
        });

        match static_entry {
            Some(static_stop) => {
                stop.name = static_stop.name.clone();

                if !stop.has_timing && static_stop.has_timing {
                    stop.arrives = static_stop.arrives;
                    stop.predictions = static_stop.predictions.clone();
                }
            }
            None => {
                warn!(stop_id = %stop.id, "static route info does not have live stop id");
            }
        }
    }

    // Start the sequence at the static route's canonical first stop; stops
    // seen before it keep their relative order at the end
    let same_stop = ctx.same_stop.as_ref();
    if let Some(first_static) = static_stops.first() {
        if let Some(position) = live_stops
            .iter()
            .position(|stop| same_stop(&stop.id, &first_static.id))
        {
            live_stops.rotate_left(position);
        }
    }

    let stop_order = ctx.stop_order.as_ref();
    live_stops.sort_by(|a, b| stop_order(a, b));
}
