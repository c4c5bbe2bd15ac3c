//! Public query surface.
//!
//! [`TransitView`] is what presentation layers talk to: every query is
//! keyed by global id, fans out to the bound providers, runs the
//! reconciliation engine, remaps the result to global ids, and caches the
//! finished snapshot. Point-in-time queries (`as_of`) bypass the cache in
//! both directions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::cache::ViewCache;
use crate::config::ViewConfig;
use crate::identifiers::{GlobalId, GlobalIdCodec, RouteId, StopId, SystemId, VehicleId};
use crate::models::types::{
    DirectionStop, Result, RouteAtStop, RouteInfo, RoutePaths, ServiceInfo, StopInfo, VehicleInfo,
};
use crate::models::views::{
    DirectionSegmentView, DirectionStopView, DirectionView, RouteListView, RouteStopView,
    RouteView, StopView, VehicleView,
};
use crate::reconcile::{
    accumulate_stop_info, merge_route_info, merge_routes, merge_stop_info,
    merge_stop_info_for_route, RouteMergeContext,
};
use crate::registry::ProviderRegistry;

const CACHE_GROUP: &str = "View";

/// The four per-shape view caches. All share the namespace and TTL from
/// configuration; inject custom stores by building this directly.
pub struct ViewCaches {
    pub stop: ViewCache<StopView>,
    pub stop_route: ViewCache<RouteAtStop>,
    pub route: ViewCache<RouteView>,
    pub routes: ViewCache<RouteListView>,
}

impl ViewCaches {
    pub fn in_memory(config: &ViewConfig) -> Self {
        let ttl = config.effective_cache_ttl();
        Self {
            stop: ViewCache::in_memory(CACHE_GROUP, ttl),
            stop_route: ViewCache::in_memory(CACHE_GROUP, ttl),
            route: ViewCache::in_memory(CACHE_GROUP, ttl),
            routes: ViewCache::in_memory(CACHE_GROUP, ttl),
        }
    }
}

/// Unified, cached, globally-keyed view over every configured transit
/// system.
pub struct TransitView {
    registry: ProviderRegistry,
    codec: GlobalIdCodec,
    config: ViewConfig,
    caches: ViewCaches,
}

impl TransitView {
    pub fn new(registry: ProviderRegistry, config: ViewConfig) -> Self {
        let caches = ViewCaches::in_memory(&config);
        Self::with_caches(registry, config, caches)
    }

    pub fn with_caches(registry: ProviderRegistry, config: ViewConfig, caches: ViewCaches) -> Self {
        let codec = GlobalIdCodec::new(&config.id_separator);
        Self {
            registry,
            codec,
            config,
            caches,
        }
    }

    pub fn codec(&self) -> &GlobalIdCodec {
        &self.codec
    }

    // ---- Stop queries ----

    /// Merged stop view across every binding serving the stop.
    pub fn stop_info(&self, global_stop_id: &GlobalId) -> Result<Option<StopView>> {
        let cache_key = format!("stopInfo.{global_stop_id}");
        if let Some(view) = self.caches.stop.get(&cache_key) {
            return Ok(Some(view));
        }

        let (system, stop_id) = self.codec.decode(global_stop_id)?;
        let stop_id = StopId::new(stop_id);

        let mut accumulated = None;
        for binding in self.registry.bindings_for_stop(&system, &stop_id) {
            let live = match &binding.live {
                Some(provider) => provider.stop_info(&stop_id)?,
                None => None,
            };
            let static_info = match &binding.static_source {
                Some(provider) => provider.stop_info(&stop_id)?,
                None => None,
            };

            if let Some(merged) = merge_stop_info(live, static_info) {
                accumulate_stop_info(&mut accumulated, merged);
            }
        }

        let Some(info) = accumulated else {
            return Ok(None);
        };
        let view = self.remap_stop_info(&system, info);
        self.caches.stop.set(&cache_key, view.clone());
        Ok(Some(view))
    }

    /// Arrival data for one route at one stop.
    pub fn stop_info_for_route(
        &self,
        global_route_id: &GlobalId,
        global_stop_id: &GlobalId,
    ) -> Result<Option<RouteAtStop>> {
        let cache_key = format!("stopInfoForRoute.{global_route_id}.{global_stop_id}");
        if let Some(info) = self.caches.stop_route.get(&cache_key) {
            return Ok(Some(info));
        }

        let (system, route_id) = self.codec.decode(global_route_id)?;
        let (_, stop_id) = self.codec.decode(global_stop_id)?;
        let route_id = RouteId::new(route_id);
        let stop_id = StopId::new(stop_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        let live = match &binding.live {
            Some(provider) => provider.stop_info_for_route(&route_id, &stop_id)?,
            None => None,
        };
        let static_info = match &binding.static_source {
            Some(provider) => provider.stop_info_for_route(&route_id, &stop_id)?,
            None => None,
        };

        let Some(merged) = merge_stop_info_for_route(live, static_info) else {
            return Ok(None);
        };
        self.caches.stop_route.set(&cache_key, merged.clone());
        Ok(Some(merged))
    }

    // ---- Route queries ----

    /// Merged route view. An explicit `as_of` time always recomputes and
    /// never touches the cache.
    pub fn route_info(
        &self,
        global_route_id: &GlobalId,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<RouteView>> {
        let cache_key = format!("routeInfo.{global_route_id}");
        if as_of.is_none() {
            if let Some(view) = self.caches.route.get(&cache_key) {
                return Ok(Some(view));
            }
        }

        let (system, route_id) = self.codec.decode(global_route_id)?;
        let route_id = RouteId::new(route_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        let live = match &binding.live {
            Some(provider) => provider.route_info(&route_id, as_of)?,
            None => None,
        };
        let static_info = match &binding.static_source {
            Some(provider) => provider.route_info(&route_id, as_of)?,
            None => None,
        };

        let ctx = RouteMergeContext {
            now: Utc::now(),
            max_arrival_delay: self.config.max_arrival_delay,
            same_stop: &self.config.same_stop,
            stop_order: &self.config.stop_order,
        };
        let Some(merged) = merge_route_info(live, static_info, &ctx) else {
            return Ok(None);
        };

        let view = self.remap_route_info(&system, merged);
        if as_of.is_none() {
            self.caches.route.set(&cache_key, view.clone());
        }
        Ok(Some(view))
    }

    /// All routes across every binding, in configured binding order with
    /// first-binding-wins on duplicate global ids.
    pub fn routes(&self, as_of: Option<DateTime<Utc>>) -> Result<RouteListView> {
        let cache_key = "allRoutes";
        if as_of.is_none() {
            if let Some(view) = self.caches.routes.get(cache_key) {
                return Ok(view);
            }
        }

        let mut all_routes = RouteListView::new();
        for binding in self.registry.bindings() {
            let resolved = binding.resolve();
            let live = match &resolved.live {
                Some(provider) => provider.routes(as_of)?,
                None => BTreeMap::new(),
            };
            let static_routes = match &resolved.static_source {
                Some(provider) => provider.routes(as_of)?,
                None => BTreeMap::new(),
            };

            for (route_id, info) in merge_routes(live, static_routes) {
                let global = self.codec.encode(&resolved.system, route_id.as_str());
                if !all_routes.contains_key(&global) {
                    all_routes.insert(global, self.remap_route_info(&resolved.system, info));
                }
            }
        }

        if as_of.is_none() {
            self.caches.routes.set(cache_key, all_routes.clone());
        }
        Ok(all_routes)
    }

    /// Route geometry, live source preferred. Uncached passthrough.
    pub fn route_paths(&self, global_route_id: &GlobalId) -> Result<RoutePaths> {
        let (system, route_id) = self.codec.decode(global_route_id)?;
        let route_id = RouteId::new(route_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        if let Some(provider) = &binding.live {
            Ok(provider.route_paths(&route_id)?)
        } else if let Some(provider) = &binding.static_source {
            Ok(provider.route_paths(&route_id)?)
        } else {
            Ok(RoutePaths::new())
        }
    }

    /// Vehicle positions for a route. Exactly one source: live when bound,
    /// otherwise static. Uncached passthrough.
    pub fn route_vehicles(
        &self,
        global_route_id: &GlobalId,
    ) -> Result<BTreeMap<GlobalId, VehicleView>> {
        let (system, route_id) = self.codec.decode(global_route_id)?;
        let route_id = RouteId::new(route_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        let vehicles = if let Some(provider) = &binding.live {
            provider.route_vehicles(&route_id)?
        } else if let Some(provider) = &binding.static_source {
            provider.route_vehicles(&route_id)?
        } else {
            BTreeMap::new()
        };

        Ok(self.remap_vehicles(&system, vehicles))
    }

    pub fn service_info_for_route(
        &self,
        global_route_id: &GlobalId,
    ) -> Result<Option<ServiceInfo>> {
        let (system, route_id) = self.codec.decode(global_route_id)?;
        let route_id = RouteId::new(route_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        let mut info = match &binding.live {
            Some(provider) => provider.service_info(&route_id)?,
            None => None,
        };
        if info.is_none() {
            if let Some(provider) = &binding.static_source {
                info = provider.service_info(&route_id)?;
            }
        }
        Ok(info)
    }

    // ---- Map images ----

    pub fn map_image_for_stop(
        &self,
        global_stop_id: &GlobalId,
        width: u32,
        height: u32,
    ) -> Result<Option<Vec<u8>>> {
        let (system, stop_id) = self.codec.decode(global_stop_id)?;
        let stop_id = StopId::new(stop_id);

        let Some(binding) = self
            .registry
            .bindings_for_stop(&system, &stop_id)
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let mut image = match &binding.live {
            Some(provider) => provider.map_image_for_stop(&stop_id, width, height)?,
            None => None,
        };
        if image.is_none() {
            if let Some(provider) = &binding.static_source {
                image = provider.map_image_for_stop(&stop_id, width, height)?;
            }
        }
        Ok(image)
    }

    pub fn map_image_for_route(
        &self,
        global_route_id: &GlobalId,
        width: u32,
        height: u32,
    ) -> Result<Option<Vec<u8>>> {
        let (system, route_id) = self.codec.decode(global_route_id)?;
        let route_id = RouteId::new(route_id);

        let binding = self.registry.binding_for_route(&system, &route_id);
        let mut image = match &binding.live {
            Some(provider) => provider.map_image_for_route(&route_id, width, height)?,
            None => None,
        };
        if image.is_none() {
            if let Some(provider) = &binding.static_source {
                image = provider.map_image_for_route(&route_id, width, height)?;
            }
        }
        Ok(image)
    }

    // ---- Maintenance ----

    /// Rebuilds every live provider, e.g. to recover from upstream
    /// failures without a restart.
    pub fn refresh_live_services(&self) -> Result<()> {
        self.registry.refresh_all_live()
    }

    pub fn refresh_live(&self, system: &SystemId) -> Result<()> {
        self.registry.refresh_live(system)
    }

    // ---- Global-id remapping ----

    fn remap_stop_info(&self, system: &SystemId, info: StopInfo) -> StopView {
        StopView {
            name: info.name,
            routes: info
                .routes
                .into_iter()
                .map(|(route_id, entry)| (self.codec.encode(system, route_id.as_str()), entry))
                .collect(),
        }
    }

    fn remap_route_info(&self, system: &SystemId, info: RouteInfo) -> RouteView {
        RouteView {
            name: info.name,
            description: info.description,
            frequency: info.frequency,
            running: info.running,
            live: info.live,
            last_update: info.last_update,
            stops: info
                .stops
                .into_iter()
                .map(|stop| RouteStopView {
                    id: self.codec.encode(system, stop.id.as_str()),
                    name: stop.name,
                    arrives: stop.arrives,
                    has_timing: stop.has_timing,
                    predictions: stop.predictions,
                    upcoming: stop.upcoming.unwrap_or(false),
                })
                .collect(),
            directions: info.directions.map(|directions| {
                directions
                    .into_iter()
                    .map(|direction| DirectionView {
                        name: direction.name,
                        segments: direction
                            .segments
                            .into_iter()
                            .map(|segment| DirectionSegmentView {
                                name: segment.name,
                                stops: segment
                                    .stops
                                    .into_iter()
                                    .map(|stop| self.remap_direction_stop(system, stop))
                                    .collect(),
                            })
                            .collect(),
                        stops: direction
                            .stops
                            .into_iter()
                            .map(|stop| self.remap_direction_stop(system, stop))
                            .collect(),
                    })
                    .collect()
            }),
        }
    }

    fn remap_direction_stop(&self, system: &SystemId, stop: DirectionStop) -> DirectionStopView {
        DirectionStopView {
            id: self.codec.encode(system, stop.id.as_str()),
            name: stop.name,
            arrives: stop.arrives,
        }
    }

    fn remap_vehicles(
        &self,
        system: &SystemId,
        vehicles: BTreeMap<VehicleId, VehicleInfo>,
    ) -> BTreeMap<GlobalId, VehicleView> {
        vehicles
            .into_iter()
            .map(|(vehicle_id, vehicle)| {
                (
                    self.codec.encode(system, vehicle_id.as_str()),
                    VehicleView {
                        route_id: vehicle
                            .route_id
                            .map(|id| self.codec.encode(system, id.as_str())),
                        next_stop: vehicle
                            .next_stop
                            .map(|id| self.codec.encode(system, id.as_str())),
                        lat: vehicle.lat,
                        lon: vehicle.lon,
                        heading: vehicle.heading,
                        speed_km_h: vehicle.speed_km_h,
                        secs_since_report: vehicle.secs_since_report,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use crate::identifiers::GlobalId;
    use crate::models::types::{Error, Predictions, StopOnRoute};
    use crate::registry::{Provider, ProviderBinding};
    use crate::test_support::FixtureProvider;
    use std::sync::Arc;

    fn view(bindings: Vec<ProviderBinding>) -> TransitView {
        let config = ViewConfig::default();
        let registry = ProviderRegistry::new(bindings, &config).unwrap();
        TransitView::new(registry, config)
    }

    fn system() -> SystemId {
        SystemId::new("A")
    }

    fn gid(s: &str) -> GlobalId {
        GlobalId::new(s)
    }

    fn route_at_stop(name: &str, arrives: Option<i64>, predictions: Option<&[i64]>) -> RouteAtStop {
        RouteAtStop {
            name: name.to_string(),
            arrives: arrives.map(crate::test_support::ts),
            predictions: predictions.map(|p| p.iter().copied().map(crate::test_support::ts).collect()),
        }
    }

    #[test]
    fn test_stop_info_merges_remaps_and_caches() {
        let live = Arc::new(FixtureProvider::new().with_stop(
            "X",
            StopInfo {
                name: "x".into(),
                routes: [(RouteId::new("5"), route_at_stop("", Some(100), None))]
                    .into_iter()
                    .collect(),
            },
        ));
        let static_source = Arc::new(FixtureProvider::new().with_stop(
            "X",
            StopInfo {
                name: "Main St".into(),
                routes: [(RouteId::new("5"), route_at_stop("Five", Some(90), Some(&[90, 150])))]
                    .into_iter()
                    .collect(),
            },
        ));

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live.clone() as Provider),
            Some(static_source.clone() as Provider),
        )]);

        let result = view.stop_info(&gid("A__X")).unwrap().unwrap();
        assert_eq!(result.name, "Main St");

        let entry = &result.routes[&gid("A__5")];
        assert_eq!(entry.name, "Five");
        assert_eq!(entry.arrives, Some(crate::test_support::ts(90)));
        assert_eq!(
            entry.predictions,
            Some(
                [crate::test_support::ts(90), crate::test_support::ts(150)]
                    .into_iter()
                    .collect::<Predictions>()
            )
        );

        // Second call is served from cache without touching the providers
        let again = view.stop_info(&gid("A__X")).unwrap().unwrap();
        assert_eq!(again, result);
        assert_eq!(live.calls(), 1);
        assert_eq!(static_source.calls(), 1);
    }

    #[test]
    fn test_stop_info_for_route_merges_and_caches() {
        let live = Arc::new(FixtureProvider::new().with_stop_route(
            "5",
            "X",
            route_at_stop("", Some(200), Some(&[200])),
        ));
        let static_source = Arc::new(FixtureProvider::new().with_stop_route(
            "5",
            "X",
            route_at_stop("Five", Some(100), Some(&[100, 160])),
        ));

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live.clone() as Provider),
            Some(static_source.clone() as Provider),
        )]);

        let info = view
            .stop_info_for_route(&gid("A__5"), &gid("A__X"))
            .unwrap()
            .unwrap();
        assert_eq!(info.arrives, Some(crate::test_support::ts(100)));
        assert_eq!(
            info.predictions,
            Some(
                [
                    crate::test_support::ts(100),
                    crate::test_support::ts(160),
                    crate::test_support::ts(200),
                ]
                .into_iter()
                .collect::<Predictions>()
            )
        );

        view.stop_info_for_route(&gid("A__5"), &gid("A__X"))
            .unwrap()
            .unwrap();
        assert_eq!(live.calls(), 1);
        assert_eq!(static_source.calls(), 1);
    }

    #[test]
    fn test_stop_info_unknown_stop_is_none() {
        let view = view(vec![ProviderBinding::new(
            system(),
            Some(Arc::new(FixtureProvider::new()) as Provider),
            None,
        )]);
        assert!(view.stop_info(&gid("A__nowhere")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_global_id_propagates() {
        let view = view(vec![]);
        assert!(matches!(
            view.stop_info(&gid("noseparator")),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            view.route_info(&gid("a__b__c"), None),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_provider_fault_propagates_and_is_never_cached() {
        let live = Arc::new(
            FixtureProvider::new()
                .with_stop("X", StopInfo::default())
                .failing(),
        );
        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live.clone() as Provider),
            None,
        )]);

        assert!(matches!(view.stop_info(&gid("A__X")), Err(Error::Provider(_))));
        assert!(matches!(view.stop_info(&gid("A__X")), Err(Error::Provider(_))));
        assert_eq!(live.calls(), 2, "faults recompute every time");
    }

    #[test]
    fn test_route_info_caches_unless_as_of_given() {
        let live = Arc::new(FixtureProvider::new().with_route(
            "5",
            RouteInfo {
                name: "Five".into(),
                running: true,
                ..RouteInfo::default()
            },
        ));
        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live.clone() as Provider),
            None,
        )]);

        view.route_info(&gid("A__5"), None).unwrap().unwrap();
        view.route_info(&gid("A__5"), None).unwrap().unwrap();
        assert_eq!(live.calls(), 1);

        // Point-in-time queries bypass the cache on read and write
        let as_of = Some(crate::test_support::ts(1_000_000));
        view.route_info(&gid("A__5"), as_of).unwrap().unwrap();
        view.route_info(&gid("A__5"), as_of).unwrap().unwrap();
        assert_eq!(live.calls(), 3);

        view.route_info(&gid("A__5"), None).unwrap().unwrap();
        assert_eq!(live.calls(), 3, "cached snapshot still serves");
    }

    #[test]
    fn test_route_info_remaps_stop_ids_and_flags() {
        let now = Utc::now();
        let soon = now + chrono::Duration::seconds(30);
        let later = now + chrono::Duration::seconds(120);

        let mut live_s1 = StopOnRoute::new("S1", "");
        live_s1.arrives = Some(now + chrono::Duration::seconds(60));
        let mut live_s2 = StopOnRoute::new("S2", "");
        live_s2.arrives = Some(later);
        live_s2.has_timing = true;

        let mut static_s1 = StopOnRoute::new("S1", "Main St");
        static_s1.arrives = Some(soon);
        static_s1.has_timing = true;

        let live = Arc::new(FixtureProvider::new().with_route(
            "5",
            RouteInfo {
                name: "5".into(),
                running: true,
                stops: vec![live_s1, live_s2],
                ..RouteInfo::default()
            },
        ));
        let static_source = Arc::new(FixtureProvider::new().with_route(
            "5",
            RouteInfo {
                name: "Five".into(),
                stops: vec![static_s1],
                ..RouteInfo::default()
            },
        ));

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live as Provider),
            Some(static_source as Provider),
        )]);

        let result = view.route_info(&gid("A__5"), None).unwrap().unwrap();
        assert!(result.live);
        assert_eq!(result.name, "Five");
        assert!(result.last_update.is_some());

        assert_eq!(result.stops[0].id, gid("A__S1"));
        assert_eq!(result.stops[0].name, "Main St");
        assert_eq!(result.stops[0].arrives, Some(soon));
        assert!(result.stops[0].upcoming);

        assert_eq!(result.stops[1].id, gid("A__S2"));
        assert!(!result.stops[1].upcoming);
    }

    #[test]
    fn test_routes_aggregates_bindings_first_wins() {
        let first_live = Arc::new(FixtureProvider::new().with_route(
            "1",
            RouteInfo {
                name: "L1".into(),
                running: true,
                live: true,
                ..RouteInfo::default()
            },
        ));
        let second_static = Arc::new(
            FixtureProvider::new()
                .with_route(
                    "1",
                    RouteInfo {
                        name: "S1".into(),
                        ..RouteInfo::default()
                    },
                )
                .with_route(
                    "2",
                    RouteInfo {
                        name: "Two".into(),
                        ..RouteInfo::default()
                    },
                ),
        );

        let view = view(vec![
            ProviderBinding::new(system(), Some(first_live.clone() as Provider), None),
            ProviderBinding::new(system(), None, Some(second_static.clone() as Provider)),
        ]);

        let all = view.routes(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&gid("A__1")].name, "L1", "first binding wins");
        assert_eq!(all[&gid("A__2")].name, "Two");

        view.routes(None).unwrap();
        assert_eq!(first_live.calls(), 1);
        assert_eq!(second_static.calls(), 1);
    }

    #[test]
    fn test_route_vehicles_remaps_every_id() {
        let live = Arc::new(FixtureProvider::new().with_vehicle(
            "v1",
            VehicleInfo {
                route_id: Some(RouteId::new("5")),
                next_stop: Some(StopId::new("X")),
                lat: 42.35,
                lon: -71.06,
                heading: Some(90),
                ..VehicleInfo::default()
            },
        ));
        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live as Provider),
            None,
        )]);

        let vehicles = view.route_vehicles(&gid("A__5")).unwrap();
        let vehicle = &vehicles[&gid("A__v1")];
        assert_eq!(vehicle.route_id, Some(gid("A__5")));
        assert_eq!(vehicle.next_stop, Some(gid("A__X")));
        assert_eq!(vehicle.heading, Some(90));
    }

    #[test]
    fn test_route_paths_prefers_live_source_by_presence() {
        let live = Arc::new(FixtureProvider::new().with_empty_route("5"));
        let static_source = Arc::new(
            FixtureProvider::new()
                .with_empty_route("5")
                .with_paths(vec![geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])]),
        );

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live as Provider),
            Some(static_source as Provider),
        )]);

        // A bound live provider is used even when its answer is empty
        assert!(view.route_paths(&gid("A__5")).unwrap().is_empty());
    }

    #[test]
    fn test_service_info_falls_back_on_empty_live_answer() {
        let live = Arc::new(FixtureProvider::new().with_empty_route("5"));
        let static_source = Arc::new(
            FixtureProvider::new()
                .with_empty_route("5")
                .with_service(ServiceInfo {
                    title: "City Transit".into(),
                    subtitle: None,
                    url: Some("https://transit.example".into()),
                }),
        );

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live as Provider),
            Some(static_source as Provider),
        )]);

        let info = view.service_info_for_route(&gid("A__5")).unwrap().unwrap();
        assert_eq!(info.title, "City Transit");
    }

    #[test]
    fn test_map_image_falls_back_on_empty_live_answer() {
        let live = Arc::new(FixtureProvider::new().with_stop("X", StopInfo::default()));
        let static_source = Arc::new(
            FixtureProvider::new()
                .with_stop("X", StopInfo::default())
                .with_map_image(vec![0xFF, 0xD8]),
        );

        let view = view(vec![ProviderBinding::new(
            system(),
            Some(live as Provider),
            Some(static_source as Provider),
        )]);

        let image = view.map_image_for_stop(&gid("A__X"), 270, 270).unwrap();
        assert_eq!(image, Some(vec![0xFF, 0xD8]));
    }

    #[test]
    fn test_refresh_live_services_installs_fresh_provider() {
        let binding = ProviderBinding::new(
            system(),
            Some(Arc::new(FixtureProvider::new().with_empty_route("old")) as Provider),
            None,
        )
        .with_live_builder(|| {
            Ok(Arc::new(FixtureProvider::new().with_empty_route("new")) as Provider)
        });

        let view = view(vec![binding]);
        assert!(view.route_info(&gid("A__new"), None).unwrap().is_none());

        view.refresh_live_services().unwrap();
        assert!(view.route_info(&gid("A__new"), None).unwrap().is_some());
    }
}
