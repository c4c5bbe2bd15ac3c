//! Global-id-keyed snapshots returned by the public query surface.
//!
//! Reconciliation works entirely in local identifiers; these types are the
//! remapped output boundary. They are immutable once built and are what the
//! view cache stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::identifiers::GlobalId;
use crate::models::types::{Predictions, RouteAtStop};

/// [`StopInfo`](crate::models::types::StopInfo) with routes keyed by global id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopView {
    pub name: String,
    pub routes: BTreeMap<GlobalId, RouteAtStop>,
}

/// [`RouteInfo`](crate::models::types::RouteInfo) with every stop id remapped.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteView {
    pub name: String,
    pub description: String,
    pub frequency: u32,
    pub running: bool,
    pub live: bool,
    pub stops: Vec<RouteStopView>,
    pub directions: Option<Vec<DirectionView>>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStopView {
    pub id: GlobalId,
    pub name: String,
    pub arrives: Option<DateTime<Utc>>,
    pub has_timing: bool,
    pub predictions: Option<Predictions>,
    pub upcoming: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionView {
    pub name: String,
    pub segments: Vec<DirectionSegmentView>,
    pub stops: Vec<DirectionStopView>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionSegmentView {
    pub name: Option<String>,
    pub stops: Vec<DirectionStopView>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionStopView {
    pub id: GlobalId,
    pub name: Option<String>,
    pub arrives: Option<DateTime<Utc>>,
}

/// [`VehicleInfo`](crate::models::types::VehicleInfo) with route and
/// next-stop references remapped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleView {
    pub route_id: Option<GlobalId>,
    pub next_stop: Option<GlobalId>,
    pub lat: f64,
    pub lon: f64,
    pub heading: Option<u16>,
    pub speed_km_h: Option<f32>,
    pub secs_since_report: Option<u32>,
}

/// All known routes across every configured system.
pub type RouteListView = BTreeMap<GlobalId, RouteView>;
