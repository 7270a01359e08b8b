//! Typed identifiers for persisted entities.
//!
//! Ids are monotonically assigned by the record store, starting at 1. The
//! newtypes keep a project id from being handed to an API expecting a form id.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::Project`].
    ProjectId
);
entity_id!(
    /// Identifier of a [`crate::Form`].
    FormId
);
entity_id!(
    /// Identifier of a [`crate::Field`].
    FieldId
);
entity_id!(
    /// Identifier of an [`crate::ImportedRecord`].
    RecordId
);
