//! Explicit configuration for the view engine.
//!
//! Everything the engine needs arrives through these structs at
//! construction time: id separator, cache lifetime, arrival-delay bound,
//! and the two injectable behaviors the stop reconciliation relies on
//! (same-stop identity and the static provider's stop ordering).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;

use crate::identifiers::{StopId, SystemId};
use crate::models::traits::TransitProvider;
use crate::models::types::{Error, Result, StopOnRoute};

/// Identity-equivalence check over stop ids.
///
/// Live feeds qualify some stop ids with suffixes (NextBus appends `_ar`
/// on arrival-only entries); implementations decide which variants name
/// the same physical stop.
pub type SameStopFn = Arc<dyn Fn(&StopId, &StopId) -> bool + Send + Sync>;

/// Comparator for the final stable sort of a route's stop sequence.
///
/// The sort key is the static provider's domain knowledge; the engine
/// treats it as opaque.
pub type StopOrderFn = Arc<dyn Fn(&StopOnRoute, &StopOnRoute) -> Ordering + Send + Sync>;

/// Default same-stop check: exact match, or either id with its trailing
/// `_`-qualifier stripped matches the other.
pub fn default_same_stop(id: &StopId, other: &StopId) -> bool {
    fn base(s: &StopId) -> &str {
        s.as_str().split('_').next().unwrap_or(s.as_str())
    }
    id == other || base(id) == other.as_str() || base(other) == id.as_str()
}

/// Default stop order: keep the reconciled sequence as-is.
pub fn default_stop_order(_a: &StopOnRoute, _b: &StopOnRoute) -> Ordering {
    Ordering::Equal
}

#[derive(Clone)]
pub struct ViewConfig {
    /// Separator between system tag and local id in global ids.
    pub id_separator: String,
    /// How long merged views stay fresh in the cache.
    pub view_cache_ttl: Duration,
    /// Daemon processes recompute views ahead of user traffic.
    pub daemon_mode: bool,
    /// How far ahead of expiry a daemon recomputes (subtracted from the TTL).
    pub daemon_headstart: Duration,
    /// Arrivals further than this from now are never flagged upcoming.
    pub max_arrival_delay: Duration,
    pub same_stop: SameStopFn,
    pub stop_order: StopOrderFn,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            id_separator: "__".to_string(),
            view_cache_ttl: Duration::seconds(20),
            daemon_mode: false,
            daemon_headstart: Duration::seconds(300),
            max_arrival_delay: Duration::hours(2),
            same_stop: Arc::new(default_same_stop),
            stop_order: Arc::new(default_stop_order),
        }
    }
}

impl ViewConfig {
    /// Cache lifetime after the daemon headstart is applied, clamped at zero.
    pub fn effective_cache_ttl(&self) -> Duration {
        if self.daemon_mode {
            (self.view_cache_ttl - self.daemon_headstart).max(Duration::zero())
        } else {
            self.view_cache_ttl
        }
    }

    /// Rejects system tags that contain the separator; such tags would make
    /// global ids ambiguous to decode.
    pub fn validate_system_tag(&self, system: &SystemId) -> Result<()> {
        if system.as_str().contains(&self.id_separator) {
            return Err(Error::Configuration(format!(
                "system tag '{}' contains the global id separator '{}'",
                system, self.id_separator
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Feed configuration and provider construction
// ============================================================================

/// How to build one provider: a registered kind plus its arguments.
#[derive(Clone, Debug, Default)]
pub struct ProviderSpec {
    pub kind: String,
    pub args: HashMap<String, String>,
}

impl ProviderSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// One transit system's data sources.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub system: SystemId,
    pub live: Option<ProviderSpec>,
    pub static_source: Option<ProviderSpec>,
}

impl FeedConfig {
    pub fn new(system: impl Into<SystemId>) -> Self {
        Self {
            system: system.into(),
            live: None,
            static_source: None,
        }
    }

    pub fn with_live(mut self, spec: ProviderSpec) -> Self {
        self.live = Some(spec);
        self
    }

    pub fn with_static(mut self, spec: ProviderSpec) -> Self {
        self.static_source = Some(spec);
        self
    }
}

type ProviderCtor = Arc<dyn Fn(&ProviderSpec) -> Result<Arc<dyn TransitProvider>> + Send + Sync>;

/// Static registry mapping provider-kind keys to constructors.
///
/// Replaces configuration-driven dynamic class loading: every kind a feed
/// references must be registered here before the registry is built, and
/// unknown kinds fail eagerly.
#[derive(Clone, Default)]
pub struct ProviderFactory {
    ctors: HashMap<String, ProviderCtor>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F)
    where
        F: Fn(&ProviderSpec) -> Result<Arc<dyn TransitProvider>> + Send + Sync + 'static,
    {
        self.ctors.insert(kind.into(), Arc::new(ctor));
    }

    pub fn build(&self, spec: &ProviderSpec) -> Result<Arc<dyn TransitProvider>> {
        let ctor = self.ctors.get(&spec.kind).ok_or_else(|| {
            Error::Configuration(format!("unknown provider kind '{}'", spec.kind))
        })?;
        ctor(spec)
    }

    pub fn knows(&self, kind: &str) -> bool {
        self.ctors.contains_key(kind)
    }
}
