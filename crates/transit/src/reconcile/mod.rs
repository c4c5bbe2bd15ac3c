//! Reconciliation engine: precedence-driven merges of live and static
//! provider results.
//!
//! Doctrine: live wins real-time fields (arrivals, predictions, running
//! status); static wins descriptive fields (names, descriptions, scheduled
//! frequency) when non-empty. Static-only entities augment but never
//! shadow live-only ones.

pub mod route;
pub mod routes;
pub mod stop;
pub mod upcoming;

pub use route::{merge_route_info, RouteMergeContext};
pub use routes::merge_routes;
pub use stop::{accumulate_stop_info, merge_stop_info, merge_stop_info_for_route};
pub use upcoming::flag_upcoming_stops;
