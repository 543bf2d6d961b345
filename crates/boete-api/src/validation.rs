//! Request bodies and the field-level checks applied before a request
//! reaches the services.
//!
//! Every body is checked completely: all field violations are collected
//! and reported together as [`Error::Invalid`].

use std::sync::LazyLock;

use axum::extract::FromRequest;
use boete_core::{
  Error, Result, Violations,
  fact::NewFact,
  id::{FactId, PersonId},
  person::NewPerson,
  projection::{AttachFactRequest, NewCaseRequest},
};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;

pub const VIOLATION_DATE_REQUIRED: &str = "Overtredingsdatum dient te zijn gevuld!";
pub const LOCATION_TOO_LONG: &str =
  "Meer dan 100 tekens in pleeglocatie! Pleeglocatie mag maximaal 100 tekens bevatten";
pub const AT_LEAST_ONE_FACT: &str = boete_core::service::messages::AT_LEAST_ONE_FACT;
pub const FIRST_NAME_REQUIRED: &str = "Voornaam moet ingevuld zijn";
pub const LAST_NAME_REQUIRED: &str = "Achternaam moet ingevuld zijn";
pub const POSTCODE_INVALID: &str =
  "Voer een geldige postcode in. 4 cijfers, een spatie en 2 hoofdletters";
pub const BSN_INVALID: &str = "Voer een geldig 9 cijferig BSN nummer in.";
pub const BIRTH_DATE_REQUIRED: &str = "Geboortedatum dient te zijn gevuld!";
pub const FACT_CODE_REQUIRED: &str = "Feitcode moet ingevuld zijn";
pub const AMOUNT_NEGATIVE: &str = "Bedrag mag niet negatief zijn";
pub const DESCRIPTION_REQUIRED: &str = "Omschrijving moet ingevuld zijn";

const MAX_LOCATION_CHARS: usize = 100;

static POSTCODE: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"^[1-9][0-9]{3} [A-Z]{2}$").ok());
static BSN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{9}$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
  pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn not_blank(value: &str) -> bool { !value.trim().is_empty() }

// ─── Extractor ───────────────────────────────────────────────────────────────

/// [`axum::Json`] with parse failures reported as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Body<T>(pub T);

// ─── Persons ─────────────────────────────────────────────────────────────────

/// Body of `POST /personen` and `PUT /personen/{id}`.
#[derive(Debug, Deserialize)]
pub struct PersonBody {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  #[serde(default)]
  pub street:       String,
  #[serde(default)]
  pub house_number: String,
  pub postcode:     Option<String>,
  #[serde(default)]
  pub city:         String,
  pub bsn:          Option<String>,
  pub birth_date:   Option<NaiveDate>,
}

impl PersonBody {
  pub fn validate(self) -> Result<NewPerson> {
    let mut v = Violations::new();

    let first_name =
      v.require(self.first_name.filter(|n| not_blank(n)), || FIRST_NAME_REQUIRED.into());
    let last_name =
      v.require(self.last_name.filter(|n| not_blank(n)), || LAST_NAME_REQUIRED.into());
    let postcode = v.require(
      self.postcode.filter(|p| matches(&POSTCODE, p)),
      || POSTCODE_INVALID.into(),
    );
    let bsn = v.require(self.bsn.filter(|b| matches(&BSN, b)), || BSN_INVALID.into());
    let birth_date = v.require(self.birth_date, || BIRTH_DATE_REQUIRED.into());

    match (first_name, last_name, postcode, bsn, birth_date) {
      (Some(first_name), Some(last_name), Some(postcode), Some(bsn), Some(birth_date))
        if v.is_empty() =>
      {
        Ok(NewPerson {
          first_name,
          last_name,
          street: self.street,
          house_number: self.house_number,
          postcode,
          city: self.city,
          bsn,
          birth_date,
        })
      }
      _ => Err(Error::Invalid(v)),
    }
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Body of `POST /feiten`.
#[derive(Debug, Deserialize)]
pub struct FactBody {
  #[serde(default)]
  pub code:        String,
  #[serde(default)]
  pub description: String,
  pub amount:      Decimal,
}

impl FactBody {
  pub fn validate(self) -> Result<NewFact> {
    let mut v = Violations::new();
    v.reject_if(!not_blank(&self.code), || FACT_CODE_REQUIRED.into());
    v.reject_if(self.amount.is_sign_negative() && !self.amount.is_zero(), || {
      AMOUNT_NEGATIVE.into()
    });
    v.finish(Error::Invalid)?;

    Ok(NewFact {
      code:        self.code,
      description: self.description,
      amount:      self.amount,
    })
  }
}

/// Body of `POST /statussen`.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
  #[serde(default)]
  pub description: String,
}

impl StatusBody {
  pub fn validate(self) -> Result<String> {
    let mut v = Violations::new();
    v.reject_if(!not_blank(&self.description), || DESCRIPTION_REQUIRED.into());
    v.finish(Error::Invalid)?;
    Ok(self.description)
  }
}

// ─── Cases ───────────────────────────────────────────────────────────────────

/// Body of `POST /zaken`.
#[derive(Debug, Deserialize)]
pub struct CaseBody {
  pub violation_date: Option<NaiveDate>,
  pub location:       Option<String>,
  pub person_id:      PersonId,
  pub fact_ids:       Option<Vec<FactId>>,
}

impl CaseBody {
  pub fn validate(self) -> Result<NewCaseRequest> {
    let mut v = Violations::new();

    let violation_date =
      v.require(self.violation_date, || VIOLATION_DATE_REQUIRED.into());
    v.reject_if(
      self
        .location
        .as_deref()
        .is_some_and(|l| l.chars().count() > MAX_LOCATION_CHARS),
      || LOCATION_TOO_LONG.into(),
    );
    let fact_ids = v.require(
      self.fact_ids.filter(|ids| !ids.is_empty()),
      || AT_LEAST_ONE_FACT.into(),
    );

    match (violation_date, fact_ids) {
      (Some(violation_date), Some(fact_ids)) if v.is_empty() => Ok(NewCaseRequest {
        violation_date,
        location: self.location,
        person_id: self.person_id,
        fact_ids,
      }),
      _ => Err(Error::Invalid(v)),
    }
  }
}

/// Body of `PUT /zaken/{id}/feiten`.
pub fn validate_attach(requests: Vec<AttachFactRequest>) -> Result<Vec<AttachFactRequest>> {
  let mut v = Violations::new();
  v.reject_if(requests.is_empty(), || AT_LEAST_ONE_FACT.into());
  v.finish(Error::Invalid)?;
  Ok(requests)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn person_body() -> PersonBody {
    PersonBody {
      first_name:   Some("Jan".into()),
      last_name:    Some("Jansen".into()),
      street:       "Dorpsstraat".into(),
      house_number: "1".into(),
      postcode:     Some("1234 AB".into()),
      city:         "Utrecht".into(),
      bsn:          Some("123456789".into()),
      birth_date:   NaiveDate::from_ymd_opt(1990, 1, 1),
    }
  }

  #[test]
  fn valid_person_passes() {
    let person = person_body().validate().unwrap();
    assert_eq!(person.postcode, "1234 AB");
  }

  #[test]
  fn person_reports_every_violation_in_field_order() {
    let body = PersonBody {
      first_name: Some("  ".into()),
      last_name: None,
      postcode: Some("0123 ab".into()),
      bsn: Some("12345".into()),
      birth_date: None,
      ..person_body()
    };

    let err = body.validate().unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    assert_eq!(
      err.messages(),
      vec![
        FIRST_NAME_REQUIRED,
        LAST_NAME_REQUIRED,
        POSTCODE_INVALID,
        BSN_INVALID,
        BIRTH_DATE_REQUIRED,
      ]
    );
  }

  #[test]
  fn postcode_pattern() {
    assert!(matches(&POSTCODE, "9999 ZZ"));
    assert!(!matches(&POSTCODE, "1234AB"));
    assert!(!matches(&POSTCODE, "1234 Ab"));
    assert!(!matches(&POSTCODE, "0234 AB"));
  }

  #[test]
  fn case_reports_missing_date_long_location_and_no_facts() {
    let body = CaseBody {
      violation_date: None,
      location:       Some("x".repeat(101)),
      person_id:      PersonId(1),
      fact_ids:       Some(vec![]),
    };

    let err = body.validate().unwrap_err();
    assert_eq!(
      err.messages(),
      vec![VIOLATION_DATE_REQUIRED, LOCATION_TOO_LONG, AT_LEAST_ONE_FACT]
    );
  }

  #[test]
  fn location_of_exactly_100_chars_is_accepted() {
    let body = CaseBody {
      violation_date: NaiveDate::from_ymd_opt(2024, 1, 1),
      location:       Some("é".repeat(100)),
      person_id:      PersonId(1),
      fact_ids:       Some(vec![FactId(1)]),
    };
    assert!(body.validate().is_ok());
  }

  #[test]
  fn fact_and_status_checks() {
    let fact = FactBody {
      code:        " ".into(),
      description: String::new(),
      amount:      Decimal::new(-1, 2),
    };
    assert_eq!(
      fact.validate().unwrap_err().messages(),
      vec![FACT_CODE_REQUIRED, AMOUNT_NEGATIVE]
    );

    let free = FactBody {
      code:        "VBF-000".into(),
      description: String::new(),
      amount:      Decimal::ZERO,
    };
    assert!(free.validate().is_ok());

    let status = StatusBody { description: String::new() };
    assert_eq!(status.validate().unwrap_err().messages(), vec![DESCRIPTION_REQUIRED]);
  }

  #[test]
  fn attach_requires_a_fact() {
    let err = validate_attach(vec![]).unwrap_err();
    assert_eq!(err.messages(), vec![AT_LEAST_ONE_FACT]);
  }
}
