//! In-memory provider fixture shared by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::identifiers::{RouteId, StopId, VehicleId};
use crate::models::traits::{ProviderResult, TransitProvider};
use crate::models::types::{
    ProviderFault, RouteAtStop, RouteInfo, RoutePaths, ServiceInfo, StopInfo, VehicleInfo,
};

/// Timestamp at `secs` seconds past the Unix epoch.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Scripted provider: serves exactly the data it was given, counts data
/// queries, and can be switched to fail every query with a hard fault.
#[derive(Default)]
pub struct FixtureProvider {
    routes: BTreeMap<RouteId, RouteInfo>,
    stops: HashMap<StopId, StopInfo>,
    stop_routes: HashMap<(RouteId, StopId), RouteAtStop>,
    vehicles: BTreeMap<VehicleId, VehicleInfo>,
    paths: RoutePaths,
    service: Option<ServiceInfo>,
    map_image: Option<Vec<u8>>,
    failing: bool,
    calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, id: impl Into<RouteId>, info: RouteInfo) -> Self {
        self.routes.insert(id.into(), info);
        self
    }

    pub fn with_empty_route(self, id: impl Into<RouteId>) -> Self {
        self.with_route(id, RouteInfo::default())
    }

    pub fn with_stop(mut self, id: impl Into<StopId>, info: StopInfo) -> Self {
        self.stops.insert(id.into(), info);
        self
    }

    pub fn with_stop_route(
        mut self,
        route: impl Into<RouteId>,
        stop: impl Into<StopId>,
        info: RouteAtStop,
    ) -> Self {
        self.stop_routes.insert((route.into(), stop.into()), info);
        self
    }

    pub fn with_vehicle(mut self, id: impl Into<VehicleId>, info: VehicleInfo) -> Self {
        self.vehicles.insert(id.into(), info);
        self
    }

    pub fn with_paths(mut self, paths: RoutePaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_service(mut self, service: ServiceInfo) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_map_image(mut self, image: Vec<u8>) -> Self {
        self.map_image = Some(image);
        self
    }

    /// Every data query returns a hard [`ProviderFault`].
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of data queries served so far (capability checks excluded).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn tally(&self) -> ProviderResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failing {
            Err(ProviderFault("fixture fault".into()))
        } else {
            Ok(())
        }
    }
}

impl TransitProvider for FixtureProvider {
    fn has_route(&self, route_id: &RouteId) -> bool {
        self.routes.contains_key(route_id)
            || self.stop_routes.keys().any(|(r, _)| r == route_id)
    }

    fn has_stop(&self, stop_id: &StopId) -> bool {
        self.stops.contains_key(stop_id) || self.stop_routes.keys().any(|(_, s)| s == stop_id)
    }

    fn stop_info(&self, stop_id: &StopId) -> ProviderResult<Option<StopInfo>> {
        self.tally()?;
        Ok(self.stops.get(stop_id).cloned())
    }

    fn stop_info_for_route(
        &self,
        route_id: &RouteId,
        stop_id: &StopId,
    ) -> ProviderResult<Option<RouteAtStop>> {
        self.tally()?;
        Ok(self
            .stop_routes
            .get(&(route_id.clone(), stop_id.clone()))
            .cloned())
    }

    fn route_info(
        &self,
        route_id: &RouteId,
        _as_of: Option<DateTime<Utc>>,
    ) -> ProviderResult<Option<RouteInfo>> {
        self.tally()?;
        Ok(self.routes.get(route_id).cloned())
    }

    fn routes(&self, _as_of: Option<DateTime<Utc>>) -> ProviderResult<BTreeMap<RouteId, RouteInfo>> {
        self.tally()?;
        Ok(self.routes.clone())
    }

    fn route_paths(&self, _route_id: &RouteId) -> ProviderResult<RoutePaths> {
        self.tally()?;
        Ok(self.paths.clone())
    }

    fn route_vehicles(
        &self,
        route_id: &RouteId,
    ) -> ProviderResult<BTreeMap<VehicleId, VehicleInfo>> {
        self.tally()?;
        Ok(self
            .vehicles
            .iter()
            .filter(|(_, v)| v.route_id.as_ref() == Some(route_id))
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect())
    }

    fn service_info(&self, _route_id: &RouteId) -> ProviderResult<Option<ServiceInfo>> {
        self.tally()?;
        Ok(self.service.clone())
    }

    fn map_image_for_stop(
        &self,
        _stop_id: &StopId,
        _width: u32,
        _height: u32,
    ) -> ProviderResult<Option<Vec<u8>>> {
        self.tally()?;
        Ok(self.map_image.clone())
    }

    fn map_image_for_route(
        &self,
        _route_id: &RouteId,
        _width: u32,
        _height: u32,
    ) -> ProviderResult<Option<Vec<u8>>> {
        self.tally()?;
        Ok(self.map_image.clone())
    }
}
