//! Fact ("feit"): a catalog entry describing one violation type.
//!
//! Facts are immutable reference data. Cases hold them by identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::FactId;

/// A persisted violation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
  pub fact_id:     FactId,
  /// Catalog code, e.g. `"VBF-003"`.
  pub code:        String,
  pub description: String,
  /// The fine for this violation; never negative.
  pub amount:      Decimal,
}

/// Input to [`crate::store::FactStore::add_fact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFact {
  pub code:        String,
  pub description: String,
  pub amount:      Decimal,
}

impl NewFact {
  pub fn with_id(self, fact_id: FactId) -> Fact {
    Fact {
      fact_id,
      code: self.code,
      description: self.description,
      amount: self.amount,
    }
  }
}
