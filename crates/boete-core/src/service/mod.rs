//! Services orchestrating the use cases against an [`EntityStore`].
//!
//! [`EntityStore`]: crate::store::EntityStore

mod case;
mod catalog;
pub mod messages;
mod person;

pub use case::{CaseService, CaseSettings};
pub use catalog::CatalogService;
pub use person::PersonService;

use crate::{Error, error::StoreError};

/// Map a store failure, keeping uniqueness violations distinguishable.
pub(crate) fn write_error<E: StoreError>(err: E, conflict: impl FnOnce() -> String) -> Error {
  if err.is_conflict() {
    Error::conflict(conflict())
  } else {
    Error::store(err)
  }
}
