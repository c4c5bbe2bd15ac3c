//! Stop info reconciliation.
//!
//! Live data wins arrival estimates and predictions; static data is
//! authoritative on which routes currently serve a stop and on names.

use std::collections::hash_map::Entry;

use crate::models::types::{RouteAtStop, StopInfo};

/// Merges one system's live and static stop results.
///
/// With only one side present that side is returned unchanged. With both:
/// routes the static side does not list are dropped (live feeds keep
/// advertising routes that are out of service), static entries fill in
/// routes the live side lacks predictions for, and non-empty static names
/// win at both the route and stop level.
pub fn merge_stop_info(live: Option<StopInfo>, static_info: Option<StopInfo>) -> Option<StopInfo> {
    let (mut merged, static_info) = match (live, static_info) {
        (None, static_info) => return static_info,
        (live, None) => return live,
        (Some(live), Some(static_info)) => (live, static_info),
    };

    merged
        .routes
        .retain(|route_id, _| static_info.routes.contains_key(route_id));

    for (route_id, static_entry) in &static_info.routes {
        let needs_copy = merged
            .routes
            .get(route_id)
            .map_or(true, |entry| entry.predictions.is_none());
        if needs_copy {
            merged.routes.insert(route_id.clone(), static_entry.clone());
        }

        if !static_entry.name.is_empty() {
            if let Some(entry) = merged.routes.get_mut(route_id) {
                entry.name = static_entry.name.clone();
            }
        }
    }

    if !static_info.name.is_empty() {
        merged.name = static_info.name;
    }

    Some(merged)
}

/// Folds one binding's merged result into the running stop view.
///
/// Several bindings of a system can serve the same stop. The first
/// contribution seeds the accumulator; later ones add routes the
/// accumulator lacks and union their predictions into routes it already
/// has. A contribution without predictions never erases existing ones.
pub fn accumulate_stop_info(accumulator: &mut Option<StopInfo>, contribution: StopInfo) {
    let Some(acc) = accumulator else {
        *accumulator = Some(contribution);
        return;
    };

    for (route_id, incoming) in contribution.routes {
        match acc.routes.entry(route_id) {
            Entry::Vacant(vacant) => {
                vacant.insert(incoming);
            }
            Entry::Occupied(mut occupied) => {
                let Some(predictions) = incoming.predictions else {
                    continue;
                };
                if predictions.is_empty() {
                    continue;
                }
                let existing = occupied.get_mut();
                match existing.predictions.take() {
                    Some(mut merged) => {
                        merged.extend(predictions);
                        existing.predictions = Some(merged);
                    }
                    None => existing.predictions = Some(predictions),
                }
            }
        }
    }
}

/// Merges live and static arrival data for a single (route, stop) pair.
///
/// The earlier of the two arrival estimates wins; static predictions fill
/// in when live reported none and are unioned in when both sides have them.
pub fn merge_stop_info_for_route(
    live: Option<RouteAtStop>,
    static_info: Option<RouteAtStop>,
) -> Option<RouteAtStop> {
    let (mut merged, static_info) = match (live, static_info) {
        (None, static_info) => return static_info,
        (live, None) => return live,
        (Some(live), Some(static_info)) => (live, static_info),
    };

    if let Some(static_arrives) = static_info.arrives {
        if merged.arrives.map_or(true, |arrives| static_arrives < arrives) {
            merged.arrives = Some(static_arrives);
        }
    }

    match (merged.predictions.take(), static_info.predictions) {
        (None, static_predictions) => merged.predictions = static_predictions,
        (Some(mut existing), Some(static_predictions)) => {
            existing.extend(static_predictions);
            merged.predictions = Some(existing);
        }
        (Some(existing), None) => merged.predictions = Some(existing),
    }

    Some(merged)
}
