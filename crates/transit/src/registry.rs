//! Per-system provider bindings and capability-based resolution.
//!
//! A binding pairs one transit system's optional live and static providers.
//! Bindings are built once from configuration and never structurally
//! mutated; the only moving part is the live provider, which
//! [`ProviderBinding::refresh_live`] replaces with a single atomic swap so
//! concurrent lookups always observe a complete provider.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::debug;

use crate::config::{FeedConfig, ProviderFactory, ViewConfig};
use crate::identifiers::{RouteId, StopId, SystemId};
use crate::models::traits::TransitProvider;
use crate::models::types::Result;

pub type Provider = Arc<dyn TransitProvider>;

type LiveBuilder = Arc<dyn Fn() -> Result<Provider> + Send + Sync>;

// Sized wrapper so the trait object can live inside an ArcSwapOption.
struct LiveSlot(Provider);

pub struct ProviderBinding {
    system: SystemId,
    live: ArcSwapOption<LiveSlot>,
    static_source: Option<Provider>,
    live_builder: Option<LiveBuilder>,
}

impl ProviderBinding {
    pub fn new(system: SystemId, live: Option<Provider>, static_source: Option<Provider>) -> Self {
        Self {
            system,
            live: ArcSwapOption::new(live.map(|p| Arc::new(LiveSlot(p)))),
            static_source,
            live_builder: None,
        }
    }

    /// Attaches the constructor used by [`refresh_live`](Self::refresh_live)
    /// to rebuild the live provider.
    pub fn with_live_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn() -> Result<Provider> + Send + Sync + 'static,
    {
        self.live_builder = Some(Arc::new(builder));
        self
    }

    pub fn system(&self) -> &SystemId {
        &self.system
    }

    pub fn live(&self) -> Option<Provider> {
        self.live.load_full().map(|slot| slot.0.clone())
    }

    pub fn static_source(&self) -> Option<Provider> {
        self.static_source.clone()
    }

    /// Consistent snapshot of both providers.
    pub fn resolve(&self) -> ResolvedBinding {
        ResolvedBinding {
            system: self.system.clone(),
            live: self.live(),
            static_source: self.static_source(),
        }
    }

    /// Rebuilds the live provider and swaps it in atomically.
    ///
    /// On builder failure the previous provider keeps serving. Bindings
    /// without a builder (fixed live provider, or none) are left untouched.
    pub fn refresh_live(&self) -> Result<()> {
        let Some(builder) = &self.live_builder else {
            debug!(system = %self.system, "no live builder attached, skipping refresh");
            return Ok(());
        };
        let fresh = builder()?;
        self.live.store(Some(Arc::new(LiveSlot(fresh))));
        debug!(system = %self.system, "live provider refreshed");
        Ok(())
    }
}

/// Point-in-time resolution of a binding: the system tag plus whichever
/// providers were installed at the moment of lookup.
#[derive(Clone)]
pub struct ResolvedBinding {
    pub system: SystemId,
    pub live: Option<Provider>,
    pub static_source: Option<Provider>,
}

impl ResolvedBinding {
    /// A binding with no providers; resolution never fails, it returns this.
    pub fn empty(system: SystemId) -> Self {
        Self {
            system,
            live: None,
            static_source: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_none() && self.static_source.is_none()
    }
}

/// Ordered collection of all configured bindings.
///
/// Insertion order is configuration order; aggregate queries iterate it and
/// must stay deterministic for a given configuration.
pub struct ProviderRegistry {
    bindings: Vec<ProviderBinding>,
}

impl ProviderRegistry {
    pub fn new(bindings: Vec<ProviderBinding>, config: &ViewConfig) -> Result<Self> {
        for binding in &bindings {
            config.validate_system_tag(&binding.system)?;
        }
        Ok(Self { bindings })
    }

    /// Builds every feed's providers through the factory. Unknown provider
    /// kinds and invalid system tags fail here, before anything serves.
    pub fn from_feeds(
        feeds: &[FeedConfig],
        factory: &ProviderFactory,
        config: &ViewConfig,
    ) -> Result<Self> {
        let mut bindings = Vec::with_capacity(feeds.len());

        for feed in feeds {
            config.validate_system_tag(&feed.system)?;

            let static_source = feed
                .static_source
                .as_ref()
                .map(|spec| factory.build(spec))
                .transpose()?;

            let live = feed
                .live
                .as_ref()
                .map(|spec| factory.build(spec))
                .transpose()?;

            let mut binding = ProviderBinding::new(feed.system.clone(), live, static_source);

            if let Some(spec) = feed.live.clone() {
                let factory = factory.clone();
                binding = binding.with_live_builder(move || factory.build(&spec));
            }

            bindings.push(binding);
        }

        Ok(Self { bindings })
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ProviderBinding> {
        self.bindings.iter()
    }

    /// First binding for the system whose live or static provider knows the
    /// route. Returns an empty binding when nothing matches.
    pub fn binding_for_route(&self, system: &SystemId, route_id: &RouteId) -> ResolvedBinding {
        for binding in &self.bindings {
            if binding.system != *system {
                continue;
            }
            let resolved = binding.resolve();
            if resolved
                .live
                .as_ref()
                .is_some_and(|p| p.has_route(route_id))
                || resolved
                    .static_source
                    .as_ref()
                    .is_some_and(|p| p.has_route(route_id))
            {
                return resolved;
            }
        }
        ResolvedBinding::empty(system.clone())
    }

    /// Every binding for the system that serves the stop, in configured
    /// order. Stops can be shared by several systems' bindings.
    pub fn bindings_for_stop(&self, system: &SystemId, stop_id: &StopId) -> Vec<ResolvedBinding> {
        self.bindings
            .iter()
            .filter(|binding| binding.system == *system)
            .map(|binding| binding.resolve())
            .filter(|resolved| {
                resolved.live.as_ref().is_some_and(|p| p.has_stop(stop_id))
                    || resolved
                        .static_source
                        .as_ref()
                        .is_some_and(|p| p.has_stop(stop_id))
            })
            .collect()
    }

    pub fn refresh_live(&self, system: &SystemId) -> Result<()> {
        for binding in self.bindings.iter().filter(|b| b.system == *system) {
            binding.refresh_live()?;
        }
        Ok(())
    }

    pub fn refresh_all_live(&self) -> Result<()> {
        for binding in &self.bindings {
            binding.refresh_live()?;
        }
        Ok(())
    }
}
