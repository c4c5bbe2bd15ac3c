//! Type-safe, efficient identifiers for transit entities.
//!
//! All identifiers use Arc<str> for cheap cloning and minimal memory overhead.
//! Local identifiers (`RouteId`, `StopId`, `VehicleId`) are scoped to one
//! transit system; [`GlobalId`] is the system-prefixed form exposed to
//! callers, built and split by [`GlobalIdCodec`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::models::types::{Error, Result};

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                <String as serde::Deserialize>::deserialize(deserializer).map(Self::new)
            }
        }
    };
}

impl_identifier!(SystemId);
impl_identifier!(RouteId);
impl_identifier!(StopId);
impl_identifier!(VehicleId);
impl_identifier!(GlobalId);

/// Builds and splits system-prefixed global identifiers.
///
/// The separator is fixed once per process via configuration and must not
/// occur inside a system tag (validated at registry construction).
#[derive(Clone, Debug)]
pub struct GlobalIdCodec {
    separator: Arc<str>,
}

impl GlobalIdCodec {
    pub fn new(separator: impl AsRef<str>) -> Self {
        Self {
            separator: separator.as_ref().into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn encode(&self, system: &SystemId, local_id: &str) -> GlobalId {
        GlobalId::new(format!("{}{}{}", system, self.separator, local_id))
    }

    /// Splits a global identifier back into its system tag and local id.
    ///
    /// Fails with [`Error::InvalidIdentifier`] unless splitting on the
    /// separator yields exactly two components.
    pub fn decode(&self, global_id: &GlobalId) -> Result<(SystemId, String)> {
        let parts: Vec<&str> = global_id.as_str().split(self.separator.as_ref()).collect();
        match parts.as_slice() {
            [system, local_id] => Ok((SystemId::new(system), (*local_id).to_string())),
            _ => Err(Error::InvalidIdentifier(global_id.as_str().to_string())),
        }
    }
}
