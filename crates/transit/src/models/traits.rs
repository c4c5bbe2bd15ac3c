//! Provider contract for transit data sources.
//!
//! Both live (real-time) and static (scheduled) sources implement the same
//! trait. Implementations can poll remote feeds, read compiled schedules,
//! or serve fixtures; the reconciliation engine only sees this interface.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::identifiers::{RouteId, StopId, VehicleId};
use crate::models::types::{
    ProviderFault, RouteAtStop, RouteInfo, RoutePaths, ServiceInfo, StopInfo, VehicleInfo,
};

/// Query result from a single provider.
///
/// `Ok(None)` (or an empty collection) means the provider has no data for
/// the request — a legitimate outcome the merge degrades around. `Err` is a
/// hard fault and always propagates to the caller.
pub type ProviderResult<T> = std::result::Result<T, ProviderFault>;

/// A single source of transit data for one system.
pub trait TransitProvider: Send + Sync {
    // ---- Capability checks ----

    /// Does this source know the route at all? Used for binding resolution,
    /// never expected to touch the network.
    fn has_route(&self, route_id: &RouteId) -> bool;

    fn has_stop(&self, stop_id: &StopId) -> bool;

    // ---- Queries ----

    fn stop_info(&self, stop_id: &StopId) -> ProviderResult<Option<StopInfo>>;

    fn stop_info_for_route(
        &self,
        route_id: &RouteId,
        stop_id: &StopId,
    ) -> ProviderResult<Option<RouteAtStop>>;

    /// Route details, optionally as of an explicit point in time rather
    /// than "now".
    fn route_info(
        &self,
        route_id: &RouteId,
        as_of: Option<DateTime<Utc>>,
    ) -> ProviderResult<Option<RouteInfo>>;

    fn routes(&self, as_of: Option<DateTime<Utc>>) -> ProviderResult<BTreeMap<RouteId, RouteInfo>>;

    fn route_paths(&self, route_id: &RouteId) -> ProviderResult<RoutePaths>;

    fn route_vehicles(
        &self,
        route_id: &RouteId,
    ) -> ProviderResult<BTreeMap<VehicleId, VehicleInfo>>;

    fn service_info(&self, route_id: &RouteId) -> ProviderResult<Option<ServiceInfo>>;

    fn map_image_for_stop(
        &self,
        _stop_id: &StopId,
        _width: u32,
        _height: u32,
    ) -> ProviderResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn map_image_for_route(
        &self,
        _route_id: &RouteId,
        _width: u32,
        _height: u32,
    ) -> ProviderResult<Option<Vec<u8>>> {
        Ok(None)
    }
}
