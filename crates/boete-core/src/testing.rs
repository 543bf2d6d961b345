//! In-memory store and notifiers for the service tests.

use std::sync::Mutex;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
  case::Case,
  error::StoreError,
  fact::{Fact, NewFact},
  id::{CaseId, EntryId, FactId, PersonId, StatusId},
  notify::Notifier,
  person::{NewPerson, Person},
  status::Status,
  store::{CaseStore, FactStore, PersonStore, StatusStore, Store},
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("duplicate bsn {0}")]
  DuplicateBsn(String),
  #[error("fact {fact} already linked to case {case}")]
  DuplicateLink { case: CaseId, fact: FactId },
}

impl StoreError for MemoryError {
  fn is_conflict(&self) -> bool {
    matches!(self, Self::DuplicateBsn(_) | Self::DuplicateLink { .. })
  }
}

struct Tables {
  persons:     Vec<Person>,
  facts:       Vec<Fact>,
  statuses:    Vec<Status>,
  cases:       Vec<Case>,
  next_entry:  i64,
  /// Link committed by another writer just before the next `save_case`.
  interleaved: Option<(CaseId, Fact)>,
}

pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self {
      tables: Mutex::new(Tables {
        persons:     Vec::new(),
        facts:       Vec::new(),
        statuses:    vec![Status::new(StatusId(1), "Open")],
        cases:       Vec::new(),
        next_entry:  1,
        interleaved: None,
      }),
    }
  }
}

impl MemoryStore {
  pub fn seed_status(&self, description: &str) -> Status {
    let mut t = self.tables.lock().unwrap();
    let status = Status::new(StatusId(t.statuses.len() as i64 + 1), description);
    t.statuses.push(status.clone());
    status
  }

  /// Have another writer link `fact` to the case right before the next save.
  pub fn link_before_next_save(&self, case_id: CaseId, fact: Fact) {
    self.tables.lock().unwrap().interleaved = Some((case_id, fact));
  }

  fn persist(t: &mut Tables, mut case: Case, case_id: CaseId) -> Case {
    let fresh = case
      .status_history()
      .iter()
      .filter(|e| !e.is_persisted())
      .count();
    let ids: Vec<EntryId> = (0..fresh)
      .map(|i| EntryId(t.next_entry + i as i64))
      .collect();
    t.next_entry += fresh as i64;
    case.assign_ids(case_id, &ids);

    match t.cases.iter_mut().find(|c| c.case_id() == Some(case_id)) {
      Some(slot) => *slot = case.clone(),
      None => t.cases.push(case.clone()),
    }
    case
  }
}

pub fn seed_person(store: &MemoryStore, bsn: &str) -> Person {
  let mut t = store.tables.lock().unwrap();
  let person = new_person(bsn).with_id(PersonId(t.persons.len() as i64 + 1));
  t.persons.push(person.clone());
  person
}

pub fn seed_fact(store: &MemoryStore, code: &str) -> Fact {
  let mut t = store.tables.lock().unwrap();
  let fact = NewFact {
    code:        code.to_owned(),
    description: "Te hard rijden".to_owned(),
    amount:      Decimal::new(9500, 2),
  }
  .with_id(FactId(t.facts.len() as i64 + 1));
  t.facts.push(fact.clone());
  fact
}

pub fn new_person(bsn: &str) -> NewPerson {
  NewPerson {
    first_name:   "Rense".into(),
    last_name:    "Houwing".into(),
    street:       "De buren".into(),
    house_number: "10".into(),
    postcode:     "8402 GH".into(),
    city:         "Drachten".into(),
    bsn:          bsn.into(),
    birth_date:   NaiveDate::from_ymd_opt(1990, 10, 12).unwrap(),
  }
}

impl Store for MemoryStore {
  type Error = MemoryError;
}

impl PersonStore for MemoryStore {
  async fn get_person(&self, id: PersonId) -> Result<Option<Person>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(t.persons.iter().find(|p| p.person_id == id).cloned())
  }

  async fn list_persons(&self) -> Result<Vec<Person>, MemoryError> {
    Ok(self.tables.lock().unwrap().persons.clone())
  }

  async fn add_person(&self, input: NewPerson) -> Result<Person, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    if t.persons.iter().any(|p| p.bsn == input.bsn) {
      return Err(MemoryError::DuplicateBsn(input.bsn));
    }
    let person = input.with_id(PersonId(t.persons.len() as i64 + 1));
    t.persons.push(person.clone());
    Ok(person)
  }

  async fn update_person(&self, person: Person) -> Result<Option<Person>, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    if t
      .persons
      .iter()
      .any(|p| p.bsn == person.bsn && p.person_id != person.person_id)
    {
      return Err(MemoryError::DuplicateBsn(person.bsn));
    }
    let Some(slot) = t.persons.iter_mut().find(|p| p.person_id == person.person_id) else {
      return Ok(None);
    };
    *slot = person.clone();
    Ok(Some(person))
  }
}

impl FactStore for MemoryStore {
  async fn get_fact(&self, id: FactId) -> Result<Option<Fact>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(t.facts.iter().find(|f| f.fact_id == id).cloned())
  }

  async fn list_facts(&self) -> Result<Vec<Fact>, MemoryError> {
    Ok(self.tables.lock().unwrap().facts.clone())
  }

  async fn add_fact(&self, input: NewFact) -> Result<Fact, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let fact = input.with_id(FactId(t.facts.len() as i64 + 1));
    t.facts.push(fact.clone());
    Ok(fact)
  }
}

impl StatusStore for MemoryStore {
  async fn get_status(&self, id: StatusId) -> Result<Option<Status>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(t.statuses.iter().find(|s| s.status_id == id).cloned())
  }

  async fn list_statuses(&self) -> Result<Vec<Status>, MemoryError> {
    Ok(self.tables.lock().unwrap().statuses.clone())
  }

  async fn add_status(&self, description: String) -> Result<Status, MemoryError> {
    Ok(self.seed_status(&description))
  }
}

impl CaseStore for MemoryStore {
  async fn get_case(&self, id: CaseId) -> Result<Option<Case>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(t.cases.iter().find(|c| c.case_id() == Some(id)).cloned())
  }

  async fn list_cases(&self) -> Result<Vec<Case>, MemoryError> {
    Ok(self.tables.lock().unwrap().cases.clone())
  }

  async fn cases_by_person(&self, person_id: PersonId) -> Result<Vec<Case>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(
      t.cases
        .iter()
        .filter(|c| c.person().person_id == person_id)
        .cloned()
        .collect(),
    )
  }

  async fn add_case(&self, case: Case) -> Result<Case, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let case_id = CaseId(t.cases.len() as i64 + 1);
    Ok(Self::persist(&mut t, case, case_id))
  }

  async fn save_case(&self, case: Case) -> Result<Case, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let case_id = case.case_id().unwrap_or(CaseId(t.cases.len() as i64 + 1));
    if let Some((id, fact)) = t.interleaved.take()
      && let Some(stored) = t.cases.iter_mut().find(|c| c.case_id() == Some(id))
    {
      stored.attach_facts(vec![fact]).unwrap();
      stored.assign_ids(id, &[]);
    }
    if let Some(stored) = t.cases.iter().find(|c| c.case_id() == Some(case_id))
      && let Some(dup) = case.unsaved_facts().iter().find(|f| stored.facts().contains(f))
    {
      return Err(MemoryError::DuplicateLink { case: case_id, fact: dup.fact_id });
    }
    Ok(Self::persist(&mut t, case, case_id))
  }
}

// ─── Notifiers ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingNotifier {
  sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
  pub fn messages(&self) -> Vec<String> { self.sent.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
  type Error = std::convert::Infallible;

  fn send(&self, message: &str) -> Result<(), Self::Error> {
    self.sent.lock().unwrap().push(message.to_owned());
    Ok(())
  }
}

#[derive(Debug, Error)]
#[error("queue unavailable")]
pub struct QueueDown;

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
  type Error = QueueDown;

  fn send(&self, _message: &str) -> Result<(), Self::Error> { Err(QueueDown) }
}
