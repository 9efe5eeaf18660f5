//! Typed record identifiers.
//!
//! Every persisted record carries a UUID v4. Wrapping each kind in its own
//! newtype keeps a location id from being passed where a character id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Common view over every typed id, used by persistence helpers.
pub trait RecordId: Copy + From<Uuid> {
    fn uuid(&self) -> Uuid;
}

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl RecordId for $name {
            fn uuid(&self) -> Uuid {
                self.0
            }
        }
    };
}

define_id!(UserId);
define_id!(CampaignId);
define_id!(LocationId);
define_id!(OrganizationId);
define_id!(CharacterId);
define_id!(EventId);
define_id!(NoteId);
