//! Entity store traits.
//!
//! The traits are implemented by storage backends (e.g. `boete-store-sqlite`).
//! The services depend on this abstraction, not on any concrete backend.
//!
//! Lookups signal absence with `Ok(None)`; a backend never reports a missing
//! row as an error. Writes may fail with an error whose
//! [`StoreError::is_conflict`] is `true` when a uniqueness rule is violated.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  case::Case,
  error::StoreError,
  fact::{Fact, NewFact},
  id::{CaseId, FactId, PersonId, StatusId},
  person::{NewPerson, Person},
  status::Status,
};

/// Common base of the entity stores: one backend, one error type.
pub trait Store: Send + Sync {
  type Error: StoreError;
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub trait PersonStore: Store {
  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persist a new person. Fails with a conflict if the BSN is taken.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite every field of an existing person. Returns `None` if no
  /// person has `person.person_id`.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;
}

// ─── Facts ───────────────────────────────────────────────────────────────────

pub trait FactStore: Store {
  fn get_fact(
    &self,
    id: FactId,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  fn list_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<Fact>, Self::Error>> + Send + '_;

  fn add_fact(
    &self,
    input: NewFact,
  ) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;
}

// ─── Statuses ────────────────────────────────────────────────────────────────

pub trait StatusStore: Store {
  fn get_status(
    &self,
    id: StatusId,
  ) -> impl Future<Output = Result<Option<Status>, Self::Error>> + Send + '_;

  fn list_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<Status>, Self::Error>> + Send + '_;

  fn add_status(
    &self,
    description: String,
  ) -> impl Future<Output = Result<Status, Self::Error>> + Send + '_;
}

// ─── Cases ───────────────────────────────────────────────────────────────────

pub trait CaseStore: Store {
  /// Retrieve a fully loaded case. Returns `None` if not found.
  fn get_case(
    &self,
    id: CaseId,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// All cases, ordered by id.
  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// All cases of one person, ordered by id.
  fn cases_by_person(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Persist a new case together with its facts and status history.
  ///
  /// The returned case carries the assigned case id and entry ids.
  fn add_case(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Persist changes to an existing case, append-only: fact links and
  /// status entries not yet stored are inserted, nothing is updated or
  /// removed. The returned case carries the newly assigned entry ids.
  fn save_case(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;
}

/// Everything the services need from a backend.
pub trait EntityStore: PersonStore + FactStore + StatusStore + CaseStore {}

impl<T> EntityStore for T where T: PersonStore + FactStore + StatusStore + CaseStore {}
