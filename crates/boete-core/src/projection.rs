//! The flat transfer shapes exchanged with callers.
//!
//! A [`CaseDto`] is always derived from a loaded aggregate and projecting
//! never fails. Requests mirror it minus the server-assigned identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  case::Case,
  id::{CaseId, EntryId, FactId, PersonId, StatusId},
};

/// Transfer projection of a [`Case`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDto {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub case_id:            Option<CaseId>,
  pub violation_date:     NaiveDate,
  pub location:           Option<String>,
  pub person_id:          PersonId,
  /// In attachment order.
  pub fact_ids:           Vec<FactId>,
  /// In insertion order; only persisted entries are listed.
  pub status_history_ids: Vec<EntryId>,
}

impl From<&Case> for CaseDto {
  fn from(case: &Case) -> Self {
    Self {
      case_id:            case.case_id(),
      violation_date:     case.violation_date(),
      location:           case.location().map(str::to_owned),
      person_id:          case.person().person_id,
      fact_ids:           case.facts().iter().map(|f| f.fact_id).collect(),
      status_history_ids: case
        .status_history()
        .iter()
        .filter_map(|e| e.entry_id)
        .collect(),
    }
  }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Input to [`crate::service::CaseService::create_case`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCaseRequest {
  pub violation_date: NaiveDate,
  pub location:       Option<String>,
  pub person_id:      PersonId,
  pub fact_ids:       Vec<FactId>,
}

/// One element of the input to
/// [`crate::service::CaseService::attach_facts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachFactRequest {
  pub fact_id: FactId,
}

/// Input to [`crate::service::CaseService::append_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendStatusRequest {
  pub status_id: StatusId,
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rust_decimal::Decimal;

  use super::*;
  use crate::{
    case::CaseStatusEntry,
    fact::Fact,
    person::Person,
    status::Status,
  };

  #[test]
  fn projection_keeps_stored_order() {
    let day = NaiveDate::from_ymd_opt(2019, 2, 18).unwrap();
    let person = Person {
      person_id:    PersonId(4),
      first_name:   "Anna".into(),
      last_name:    "de Vries".into(),
      street:       "Voltawerk".into(),
      house_number: "36".into(),
      postcode:     "8401 EN".into(),
      city:         "Gorredijk".into(),
      bsn:          "987654321".into(),
      birth_date:   NaiveDate::from_ymd_opt(1967, 10, 12).unwrap(),
    };
    let fact = |id| Fact {
      fact_id:     FactId(id),
      code:        "VBF-003".into(),
      description: "Te hard".into(),
      amount:      Decimal::new(9500, 2),
    };
    let entry = |entry_id, status_id| CaseStatusEntry {
      entry_id:   Some(EntryId(entry_id)),
      changed_on: day,
      status:     Status::new(StatusId(status_id), "x"),
    };
    let case = Case::restore(
      CaseId(3),
      day,
      None,
      person,
      vec![fact(7), fact(2)],
      vec![entry(11, 1), entry(5, 2)],
    );

    let dto = CaseDto::from(&case);
    assert_eq!(dto.case_id, Some(CaseId(3)));
    assert_eq!(dto.person_id, PersonId(4));
    assert_eq!(dto.location, None);
    assert_eq!(dto.fact_ids, vec![FactId(7), FactId(2)]);
    assert_eq!(dto.status_history_ids, vec![EntryId(11), EntryId(5)]);
  }
}
