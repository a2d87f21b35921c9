use serde::Deserialize;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        // Hash and Eq delegate to the inner String, so map lookups by &str agree.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Site`](crate::Site).
    SiteId
);
entity_id!(
    /// Identifier of a [`Building`](crate::Building).
    BuildingId
);
entity_id!(UnitId);
entity_id!(ResidentId);
entity_id!(
    /// Identifier of a resident-owned [`Vehicle`](crate::Vehicle).
    VehicleId
);
entity_id!(
    /// Structural reference to a [`ParkingSpot`](crate::ParkingSpot). Display
    /// names are derived from this, never the other way around.
    ParkingSpotId
);
entity_id!(GuestVisitId);
entity_id!(RequestId);
