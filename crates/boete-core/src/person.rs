//! Person: a registered individual who can be the subject of cases.
//!
//! Persons are master data. A case references exactly one person but never
//! owns it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::PersonId;

/// A persisted person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:    PersonId,
  pub first_name:   String,
  pub last_name:    String,
  pub street:       String,
  pub house_number: String,
  pub postcode:     String,
  pub city:         String,
  /// Burgerservicenummer; unique across all persons.
  pub bsn:          String,
  pub birth_date:   NaiveDate,
}

/// Input to [`crate::store::PersonStore::add_person`]. The identifier is
/// always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub first_name:   String,
  pub last_name:    String,
  pub street:       String,
  pub house_number: String,
  pub postcode:     String,
  pub city:         String,
  pub bsn:          String,
  pub birth_date:   NaiveDate,
}

impl NewPerson {
  /// Attach an identifier, producing the full record.
  pub fn with_id(self, person_id: PersonId) -> Person {
    Person {
      person_id,
      first_name: self.first_name,
      last_name: self.last_name,
      street: self.street,
      house_number: self.house_number,
      postcode: self.postcode,
      city: self.city,
      bsn: self.bsn,
      birth_date: self.birth_date,
    }
  }
}
