//! Core data types for merged transit views.
//!
//! These are the shapes produced by providers and consumed by the
//! reconciliation engine. All identifiers here are local (system-scoped);
//! the global-id forms live in [`crate::models::views`].

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use geo::LineString;

use crate::identifiers::{RouteId, StopId};

/// Unique arrival timestamps in ascending order.
///
/// `None` on a field of this type means the source did not report
/// predictions at all; `Some` with an empty set means it reported none.
pub type Predictions = BTreeSet<DateTime<Utc>>;

// ============================================================================
// Stop-centric data
// ============================================================================

/// Everything known about one stop: its name plus per-route arrival data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopInfo {
    pub name: String,
    pub routes: HashMap<RouteId, RouteAtStop>,
}

/// Arrival data for one route as seen from a stop.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteAtStop {
    pub name: String,
    pub arrives: Option<DateTime<Utc>>,
    pub predictions: Option<Predictions>,
}

// ============================================================================
// Route-centric data
// ============================================================================

/// Full description of a route: descriptive fields plus its ordered stops.
///
/// `frequency` is seconds between vehicles; zero means "unknown", never
/// "no service".
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteInfo {
    pub name: String,
    pub description: String,
    pub frequency: u32,
    pub running: bool,
    pub live: bool,
    pub stops: Vec<StopOnRoute>,
    pub directions: Option<Vec<Direction>>,
    pub last_update: Option<DateTime<Utc>>,
}

/// One stop in a route's ordered stop sequence.
///
/// `upcoming` stays `None` until a provider or the upcoming-arrival
/// calculator sets it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopOnRoute {
    pub id: StopId,
    pub name: String,
    pub arrives: Option<DateTime<Utc>>,
    pub has_timing: bool,
    pub predictions: Option<Predictions>,
    pub upcoming: Option<bool>,
}

impl StopOnRoute {
    pub fn new(id: impl Into<StopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arrives: None,
            has_timing: false,
            predictions: None,
            upcoming: None,
        }
    }
}

/// Schedule-mode direction structure (static providers only).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub name: String,
    pub segments: Vec<DirectionSegment>,
    pub stops: Vec<DirectionStop>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionSegment {
    pub name: Option<String>,
    pub stops: Vec<DirectionStop>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionStop {
    pub id: StopId,
    pub name: Option<String>,
    pub arrives: Option<DateTime<Utc>>,
}

// ============================================================================
// Vehicles, service info, geometry
// ============================================================================

/// A vehicle position report from a single source (never merged).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleInfo {
    pub route_id: Option<RouteId>,
    pub next_stop: Option<StopId>,
    pub lat: f64,
    pub lon: f64,
    /// Compass heading in degrees, if reported.
    pub heading: Option<u16>,
    pub speed_km_h: Option<f32>,
    pub secs_since_report: Option<u32>,
}

/// Agency-level service details for a route (opaque passthrough).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceInfo {
    pub title: String,
    pub subtitle: Option<String>,
    pub url: Option<String>,
}

/// Route path geometry, passed through from providers untouched.
pub type RoutePaths = Vec<LineString>;

// ============================================================================
// Errors
// ============================================================================

/// Hard failure from an upstream provider (network, parse).
///
/// Distinct from a provider returning `Ok(None)`, which means "no data"
/// and lets a merge degrade to the surviving source.
#[derive(Clone, Debug, thiserror::Error)]
#[error("provider fault: {0}")]
pub struct ProviderFault(pub String);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid global identifier '{0}'")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Provider(#[from] ProviderFault),

    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_zero_is_default() {
        let info = RouteInfo::default();
        assert_eq!(info.frequency, 0);
        assert!(!info.running);
        assert!(info.last_update.is_none());
    }

    #[test]
    fn test_provider_fault_converts_to_error() {
        fn fails() -> Result<()> {
            let fault = ProviderFault("upstream timed out".into());
            Err(fault.into())
        }
        assert!(matches!(fails(), Err(Error::Provider(_))));
    }
}
