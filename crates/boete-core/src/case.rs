//! Case ("zaak"): the aggregate linking one person to one or more facts,
//! together with the history of every status the case has been in.
//!
//! The aggregate owns two collections and guards their invariants:
//!
//! - the fact set is never empty and holds each fact at most once;
//! - the status history only grows. Entries are appended at the end and
//!   never altered or removed, so the current status is the last entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  fact::Fact,
  id::{CaseId, EntryId, FactId},
  person::Person,
  status::Status,
};

// ─── Status history ──────────────────────────────────────────────────────────

/// One record of the case having entered `status` on `changed_on`.
///
/// `entry_id` is `None` until the store persists the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStatusEntry {
  pub entry_id:   Option<EntryId>,
  pub changed_on: NaiveDate,
  pub status:     Status,
}

impl CaseStatusEntry {
  /// A fresh, not yet persisted entry.
  pub fn new(status: Status, changed_on: NaiveDate) -> Self {
    Self { entry_id: None, changed_on, status }
  }

  pub fn is_persisted(&self) -> bool { self.entry_id.is_some() }
}

// ─── Invariant violations ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
  #[error("a case needs at least one fact")]
  NoFacts,

  /// The listed facts are already on the case, or repeated in the request.
  #[error("facts already attached: {0:?}")]
  DuplicateFacts(Vec<FactId>),
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  case_id:        Option<CaseId>,
  violation_date: NaiveDate,
  /// Administrative cases (e.g. an uninsured vehicle) have no location.
  location:       Option<String>,
  person:         Person,
  facts:          Vec<Fact>,
  /// Leading facts the store already holds; the rest are unsaved.
  #[serde(skip)]
  stored_facts:   usize,
  status_history: Vec<CaseStatusEntry>,
}

impl Case {
  /// Open a new, unpersisted case seeded with its first status entry.
  pub fn open(
    violation_date: NaiveDate,
    location: Option<String>,
    person: Person,
    facts: Vec<Fact>,
    first_status: CaseStatusEntry,
  ) -> Result<Self, InvariantViolation> {
    if facts.is_empty() {
      return Err(InvariantViolation::NoFacts);
    }

    let mut case = Self {
      case_id: None,
      violation_date,
      location,
      person,
      facts: Vec::with_capacity(facts.len()),
      stored_facts: 0,
      status_history: vec![first_status],
    };
    case.attach_facts(facts)?;
    Ok(case)
  }

  /// Rebuild a case exactly as a store loaded it.
  pub fn restore(
    case_id: CaseId,
    violation_date: NaiveDate,
    location: Option<String>,
    person: Person,
    facts: Vec<Fact>,
    status_history: Vec<CaseStatusEntry>,
  ) -> Self {
    Self {
      case_id: Some(case_id),
      violation_date,
      location,
      person,
      stored_facts: facts.len(),
      facts,
      status_history,
    }
  }

  pub fn case_id(&self) -> Option<CaseId> { self.case_id }

  pub fn violation_date(&self) -> NaiveDate { self.violation_date }

  pub fn location(&self) -> Option<&str> { self.location.as_deref() }

  pub fn person(&self) -> &Person { &self.person }

  /// Facts in the order they were attached.
  pub fn facts(&self) -> &[Fact] { &self.facts }

  /// Every status entry ever appended, oldest first.
  pub fn status_history(&self) -> &[CaseStatusEntry] { &self.status_history }

  /// The most recently appended entry.
  pub fn current_status(&self) -> Option<&CaseStatusEntry> {
    self.status_history.last()
  }

  pub fn has_fact(&self, fact_id: FactId) -> bool {
    self.facts.iter().any(|f| f.fact_id == fact_id)
  }

  /// Attach `facts` all-or-nothing.
  ///
  /// Every fact that is already on the case, or that occurs more than once
  /// in `facts`, is reported; if there is any, nothing is attached.
  pub fn attach_facts(&mut self, facts: Vec<Fact>) -> Result<(), InvariantViolation> {
    if facts.is_empty() {
      return Err(InvariantViolation::NoFacts);
    }

    let mut duplicates = Vec::new();
    for (i, fact) in facts.iter().enumerate() {
      let repeated = facts[..i].iter().any(|f| f.fact_id == fact.fact_id);
      if repeated || self.has_fact(fact.fact_id) {
        duplicates.push(fact.fact_id);
      }
    }
    if !duplicates.is_empty() {
      return Err(InvariantViolation::DuplicateFacts(duplicates));
    }

    self.facts.extend(facts);
    Ok(())
  }

  /// Facts attached since the case was loaded or last persisted.
  pub fn unsaved_facts(&self) -> &[Fact] { &self.facts[self.stored_facts..] }

  /// Append a new entry to the end of the status history.
  pub fn append_status(&mut self, entry: CaseStatusEntry) {
    self.status_history.push(entry);
  }

  /// Record the identifiers a store assigned on persistence.
  ///
  /// Identifiers that are already set are left alone. Every fact counts as
  /// stored afterwards.
  pub fn assign_ids(&mut self, case_id: CaseId, entry_ids: &[EntryId]) {
    self.case_id.get_or_insert(case_id);
    self.stored_facts = self.facts.len();
    let mut fresh = entry_ids.iter().copied();
    for entry in self.status_history.iter_mut().filter(|e| !e.is_persisted()) {
      entry.entry_id = fresh.next();
    }
  }
}
