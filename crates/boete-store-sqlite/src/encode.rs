//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings and amounts as decimal
//! strings. Identifiers are plain `INTEGER` rowids.

use boete_core::{
  case::{Case, CaseStatusEntry},
  fact::Fact,
  id::{CaseId, EntryId, FactId, PersonId, StatusId},
  person::Person,
  status::Status,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_amount(amount: Decimal) -> String { amount.to_string() }

pub fn decode_amount(s: &str) -> Result<Decimal> {
  s.parse::<Decimal>()
    .map_err(|e| Error::Decode(format!("bad amount {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:    i64,
  pub first_name:   String,
  pub last_name:    String,
  pub street:       String,
  pub house_number: String,
  pub postcode:     String,
  pub city:         String,
  pub bsn:          String,
  pub birth_date:   String,
}

impl RawPerson {
  /// Column list matching [`RawPerson::read`], for a table aliased `p`.
  pub const COLUMNS: &'static str = "p.person_id, p.first_name, p.last_name, \
     p.street, p.house_number, p.postcode, p.city, p.bsn, p.birth_date";

  /// Read the nine person columns starting at `offset`.
  pub fn read(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:    row.get(offset)?,
      first_name:   row.get(offset + 1)?,
      last_name:    row.get(offset + 2)?,
      street:       row.get(offset + 3)?,
      house_number: row.get(offset + 4)?,
      postcode:     row.get(offset + 5)?,
      city:         row.get(offset + 6)?,
      bsn:          row.get(offset + 7)?,
      birth_date:   row.get(offset + 8)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:    PersonId(self.person_id),
      first_name:   self.first_name,
      last_name:    self.last_name,
      street:       self.street,
      house_number: self.house_number,
      postcode:     self.postcode,
      city:         self.city,
      bsn:          self.bsn,
      birth_date:   decode_date(&self.birth_date)?,
    })
  }
}

/// Raw values read directly from a `facts` row.
pub struct RawFact {
  pub fact_id:     i64,
  pub code:        String,
  pub description: String,
  pub amount:      String,
}

impl RawFact {
  pub const COLUMNS: &'static str = "f.fact_id, f.code, f.description, f.amount";

  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      fact_id:     row.get(0)?,
      code:        row.get(1)?,
      description: row.get(2)?,
      amount:      row.get(3)?,
    })
  }

  pub fn into_fact(self) -> Result<Fact> {
    Ok(Fact {
      fact_id:     FactId(self.fact_id),
      code:        self.code,
      description: self.description,
      amount:      decode_amount(&self.amount)?,
    })
  }
}

/// One `case_statuses` row joined with its status.
pub struct RawEntry {
  pub entry_id:           i64,
  pub changed_on:         String,
  pub status_id:          i64,
  pub status_description: String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<CaseStatusEntry> {
    Ok(CaseStatusEntry {
      entry_id:   Some(EntryId(self.entry_id)),
      changed_on: decode_date(&self.changed_on)?,
      status:     Status::new(StatusId(self.status_id), self.status_description),
    })
  }
}

/// A `cases` row together with everything it links to.
pub struct RawCase {
  pub case_id:        i64,
  pub violation_date: String,
  pub location:       Option<String>,
  pub person:         RawPerson,
  pub facts:          Vec<RawFact>,
  pub history:        Vec<RawEntry>,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    let facts = self
      .facts
      .into_iter()
      .map(RawFact::into_fact)
      .collect::<Result<Vec<_>>>()?;
    let history = self
      .history
      .into_iter()
      .map(RawEntry::into_entry)
      .collect::<Result<Vec<_>>>()?;

    if facts.is_empty() {
      return Err(Error::Dangling(format!("case {} has no facts", self.case_id)));
    }

    Ok(Case::restore(
      CaseId(self.case_id),
      decode_date(&self.violation_date)?,
      self.location,
      self.person.into_person()?,
      facts,
      history,
    ))
  }
}
