//! Route-list reconciliation.
//!
//! Union of live and static route lists for one system. A live entry that
//! claims the route is not running is assumed stale and replaced wholesale
//! by the static entry; running routes keep their live data under static
//! descriptive fields.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::identifiers::RouteId;
use crate::models::types::RouteInfo;

pub fn merge_routes(
    live: BTreeMap<RouteId, RouteInfo>,
    static_routes: BTreeMap<RouteId, RouteInfo>,
) -> BTreeMap<RouteId, RouteInfo> {
    if live.is_empty() {
        return static_routes;
    }

    let mut merged = live;
    for (route_id, static_route) in static_routes {
        match merged.entry(route_id) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if !entry.running {
                    *entry = static_route;
                } else {
                    // Static descriptive fields are better
                    entry.name = static_route.name;
                    entry.description = static_route.description;
                    if static_route.frequency != 0 {
                        entry.frequency = static_route.frequency;
                    }
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(static_route);
            }
        }
    }
    merged
}
