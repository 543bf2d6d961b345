//! Status: a catalog entry describing a state a case can be in.

use serde::{Deserialize, Serialize};

use crate::id::StatusId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
  pub status_id:   StatusId,
  /// e.g. `"Open"`, `"In behandeling"`.
  pub description: String,
}

impl Status {
  pub fn new(status_id: StatusId, description: impl Into<String>) -> Self {
    Self { status_id, description: description.into() }
  }
}
