//! Violation messages, as shown to API clients.
//!
//! The wording (including capitalisation) differs per operation and is part
//! of the public contract.

use std::fmt::Display;

/// Closing message of every failed fact attachment.
pub const NO_FACTS_ADDED: &str = "geen feit(en) toegevoegd";

/// A case request without any fact.
pub const AT_LEAST_ONE_FACT: &str = "Voeg minimaal 1 feit toe.";

// ── Create case / cases by person ───────────────────────────────────────

pub fn person_missing(id: impl Display) -> String {
  format!("Persoonnr {id} bestaat niet")
}

pub fn fact_missing(id: impl Display) -> String {
  format!("Feitnr {id} bestaat niet")
}

// ── Append status / get case ────────────────────────────────────────────

pub fn case_missing(id: impl Display) -> String {
  format!("ZaakNummer: {id} bestaat niet")
}

pub fn status_missing(id: impl Display) -> String {
  format!("StatusNummer: {id} bestaat niet")
}

// ── Attach facts ────────────────────────────────────────────────────────

pub fn attach_case_missing(id: impl Display) -> String {
  format!("zaakNummer: {id} bestaat niet")
}

pub fn attach_fact_missing(id: impl Display) -> String {
  format!("feitNummer: {id} bestaat niet")
}

pub fn fact_already_attached(id: impl Display) -> String {
  format!("feitNummer: {id} is reeds toegevoegd aan deze zaak")
}

// ── Persons and catalogs ────────────────────────────────────────────────

pub fn person_number_missing(id: impl Display) -> String {
  format!("PersoonNummer: {id} bestaat niet")
}

pub fn bsn_taken(bsn: impl Display) -> String {
  format!("BSN nummer: {bsn} bestaat reeds.")
}

pub fn catalog_fact_missing(id: impl Display) -> String {
  format!("Feitnummer: {id} bestaat niet")
}
