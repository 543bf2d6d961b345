//! Store-assigned identifiers.
//!
//! Every entity gets its identifier from the store on first persistence and
//! keeps it forever. The newtypes keep a `CaseId` from being passed where a
//! `FactId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
      }
    }
  };
}

entity_id!(
  /// Identifier of a registered [`Person`](crate::person::Person).
  PersonId
);
entity_id!(
  /// Identifier of a catalog [`Fact`](crate::fact::Fact).
  FactId
);
entity_id!(
  /// Identifier of a catalog [`Status`](crate::status::Status).
  StatusId
);
entity_id!(
  /// Identifier of a [`Case`](crate::case::Case).
  CaseId
);
entity_id!(
  /// Identifier of one [`CaseStatusEntry`](crate::case::CaseStatusEntry).
  EntryId
);
