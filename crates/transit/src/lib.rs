//! # transit-view
//!
//! Unified views over heterogeneous transit data sources.
//!
//! Each transit system binds an optional live (real-time) provider and an
//! optional static (scheduled) provider. Queries arrive keyed by global
//! identifiers, fan out to the bound providers, and the reconciliation
//! engine merges both answers under deterministic precedence rules: live
//! wins real-time fields, static wins descriptive fields. Merged views are
//! cached with a configurable TTL.
//!
//! ## Features
//!
//! - **Global identifiers**: system-prefixed ids decodable back to
//!   (system, local id)
//! - **Precedence-driven merging**: stop, route, and route-list
//!   reconciliation with documented edge cases
//! - **Upcoming-arrival flags**: marks the single most-imminent stop per
//!   route direction
//! - **TTL view cache**: pluggable store, point-in-time queries bypass it
//! - **Atomic live refresh**: replace a live provider without a restart
//!
//! ## Example
//!
//! ```
//! use transit_view::prelude::*;
//!
//! let codec = GlobalIdCodec::new("__");
//! let global = codec.encode(&SystemId::new("mbta"), "place-sstat");
//! assert_eq!(global.as_str(), "mbta__place-sstat");
//!
//! let (system, local_id) = codec.decode(&global).unwrap();
//! assert_eq!(system, SystemId::new("mbta"));
//! assert_eq!(local_id, "place-sstat");
//! ```

pub mod cache;
pub mod config;
pub mod identifiers;
pub mod models;
pub mod reconcile;
pub mod registry;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub mod prelude {
    pub use crate::cache::{CacheEntry, CacheStore, MemoryCacheStore, ViewCache};
    pub use crate::config::{FeedConfig, ProviderFactory, ProviderSpec, ViewConfig};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*, views::*};
    pub use crate::registry::{Provider, ProviderBinding, ProviderRegistry, ResolvedBinding};
    pub use crate::view::{TransitView, ViewCaches};
}

pub use prelude::*;
