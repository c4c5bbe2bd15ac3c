//! Upcoming-arrival flags.
//!
//! Walks a route's ordered stop sequence and marks the stops whose arrival
//! is both imminent (within the configured delay bound of now) and no later
//! than the predecessor's arrival. That combination flags the wrap point of
//! the arrival sequence: the single most-imminent stop per direction.

use chrono::{DateTime, Duration, Utc};

use crate::config::SameStopFn;
use crate::models::types::StopOnRoute;

/// Fills in `upcoming` for every stop a provider left unset.
///
/// The first stop's predecessor wraps around to the last distinct stop in
/// the sequence; on loop routes the duplicated terminal is skipped via the
/// `same_stop` equivalence.
pub fn flag_upcoming_stops(
    stops: &mut [StopOnRoute],
    now: DateTime<Utc>,
    max_arrival_delay: Duration,
    same_stop: &SameStopFn,
) {
    if stops.is_empty() {
        return;
    }

    let same_stop = same_stop.as_ref();
    let last = stops.len() - 1;
    let first_predecessor = if stops.len() == 1 {
        None
    } else if same_stop(&stops[0].id, &stops[last].id) {
        // Loop route: the terminal repeats the first stop
        Some(last - 1)
    } else {
        Some(last)
    };

    for index in 0..stops.len() {
        if stops[index].upcoming.is_some() {
            continue;
        }

        let predecessor = if index == 0 {
            first_predecessor
        } else {
            Some(index - 1)
        };

        let upcoming = match (
            stops[index].arrives,
            predecessor.and_then(|p| stops[p].arrives),
        ) {
            (Some(arrives), Some(previous)) => {
                // Suppress stale reads far from now
                (arrives - now).abs() < max_arrival_delay && arrives <= previous
            }
            _ => false,
        };
        stops[index].upcoming = Some(upcoming);
    }
}
