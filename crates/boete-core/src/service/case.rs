//! [`CaseService`]: creation, status transitions and fact attachment for
//! cases.
//!
//! Every mutating operation resolves all referenced identifiers first and
//! collects every miss before failing; no store write happens after a failed
//! phase.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::messages;
use crate::{
  Error, Result, Violations,
  case::{Case, CaseStatusEntry, InvariantViolation},
  error::StoreError as _,
  id::{CaseId, PersonId, StatusId},
  notify::{self, Notification, Notifier},
  projection::{AttachFactRequest, CaseDto, NewCaseRequest},
  status::Status,
  store::EntityStore,
};

// ─── Settings ────────────────────────────────────────────────────────────────

/// Well-known values the service needs but does not own.
#[derive(Debug, Clone)]
pub struct CaseSettings {
  /// Status every new case starts in.
  pub open_status: Status,
  /// `sender` field of outgoing notifications.
  pub sender:      String,
  /// Source of the date stamped on new status entries.
  pub today:       fn() -> NaiveDate,
}

impl Default for CaseSettings {
  fn default() -> Self {
    Self {
      open_status: Status::new(StatusId(1), "Open"),
      sender:      "boete-api".to_owned(),
      today:       || Utc::now().date_naive(),
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct CaseService<S, N> {
  store:    Arc<S>,
  notifier: Arc<N>,
  settings: Arc<CaseSettings>,
}

impl<S, N> Clone for CaseService<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
      settings: Arc::clone(&self.settings),
    }
  }
}

impl<S, N> CaseService<S, N>
where
  S: EntityStore,
  N: Notifier,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, settings: CaseSettings) -> Self {
    Self { store, notifier, settings: Arc::new(settings) }
  }

  // ── Create ────────────────────────────────────────────────────────────

  /// Open a new case for an existing person with one or more existing
  /// facts, seeded with the configured open status.
  pub async fn create_case(&self, request: NewCaseRequest) -> Result<CaseDto> {
    let mut missing = Violations::new();

    let person = self
      .store
      .get_person(request.person_id)
      .await
      .map_err(Error::store)?;
    let person =
      missing.require(person, || messages::person_missing(request.person_id));

    let mut facts = Vec::with_capacity(request.fact_ids.len());
    for &fact_id in &request.fact_ids {
      let fact = self.store.get_fact(fact_id).await.map_err(Error::store)?;
      if let Some(fact) = missing.require(fact, || messages::fact_missing(fact_id)) {
        facts.push(fact);
      }
    }

    let person = missing.finish_with(person, Error::NotFound)?;

    let first = CaseStatusEntry::new(
      self.settings.open_status.clone(),
      (self.settings.today)(),
    );
    let case = Case::open(
      request.violation_date,
      request.location,
      person,
      facts,
      first,
    )
    .map_err(|v| invariant_error(v, None))?;

    let case = self.store.add_case(case).await.map_err(Error::store)?;
    let dto = CaseDto::from(&case);

    info!(case_id = ?dto.case_id, person_id = %dto.person_id, "case created");
    self.announce(match dto.case_id {
      Some(id) => format!("Zaak {id} toegevoegd"),
      None => "Zaak toegevoegd".to_owned(),
    });
    Ok(dto)
  }

  // ── Status ────────────────────────────────────────────────────────────

  /// Append `status_id` to the case's status history.
  pub async fn append_status(
    &self,
    case_id: CaseId,
    status_id: StatusId,
  ) -> Result<CaseDto> {
    let mut missing = Violations::new();

    let case = self.store.get_case(case_id).await.map_err(Error::store)?;
    let case = missing.require(case, || messages::case_missing(case_id));

    let status = self.store.get_status(status_id).await.map_err(Error::store)?;
    let status = missing.require(status, || messages::status_missing(status_id));

    let (mut case, status) =
      missing.finish_with(case.zip(status), Error::NotFound)?;

    case.append_status(CaseStatusEntry::new(status, (self.settings.today)()));
    let case = self.store.save_case(case).await.map_err(Error::store)?;

    info!(%case_id, %status_id, "status appended");
    Ok(CaseDto::from(&case))
  }

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Attach existing facts to an existing case, all-or-nothing.
  ///
  /// Missing references are reported first (as not found); only when every
  /// reference resolves are duplicates checked (as a conflict).
  pub async fn attach_facts(
    &self,
    case_id: CaseId,
    requests: &[AttachFactRequest],
  ) -> Result<CaseDto> {
    let mut missing = Violations::new();

    let case = self.store.get_case(case_id).await.map_err(Error::store)?;
    let case = missing.require(case, || messages::attach_case_missing(case_id));

    let mut facts = Vec::with_capacity(requests.len());
    for request in requests {
      let fact = self
        .store
        .get_fact(request.fact_id)
        .await
        .map_err(Error::store)?;
      if let Some(fact) =
        missing.require(fact, || messages::attach_fact_missing(request.fact_id))
      {
        facts.push(fact);
      }
    }

    let mut case = missing.finish_with(case, |v| {
      Error::NotFound(v.with_trailer(messages::NO_FACTS_ADDED))
    })?;

    case
      .attach_facts(facts)
      .map_err(|v| invariant_error(v, Some(messages::NO_FACTS_ADDED)))?;
    let case = match self.store.save_case(case).await {
      Ok(case) => case,
      // Another writer linked some of these facts after the case was read.
      Err(e) if e.is_conflict() => return Err(self.raced_attach(case_id, requests).await),
      Err(e) => return Err(Error::store(e)),
    };

    info!(%case_id, attached = requests.len(), "facts attached");
    Ok(CaseDto::from(&case))
  }

  /// Conflict for an attach that lost to a concurrent one, naming the
  /// requested facts the case holds now.
  async fn raced_attach(&self, case_id: CaseId, requests: &[AttachFactRequest]) -> Error {
    let current = match self.store.get_case(case_id).await {
      Ok(current) => current,
      Err(e) => return Error::store(e),
    };
    let linked: Vec<_> = current
      .iter()
      .flat_map(|c| c.facts())
      .map(|f| f.fact_id)
      .collect();

    let mut conflicts = Violations::new();
    for request in requests {
      conflicts.reject_if(linked.contains(&request.fact_id), || {
        messages::fact_already_attached(request.fact_id)
      });
    }
    Error::Conflict(conflicts.with_trailer(messages::NO_FACTS_ADDED))
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn list_cases(&self) -> Result<Vec<CaseDto>> {
    let cases = self.store.list_cases().await.map_err(Error::store)?;
    Ok(cases.iter().map(CaseDto::from).collect())
  }

  pub async fn get_case(&self, case_id: CaseId) -> Result<CaseDto> {
    debug!(%case_id, "loading case");
    let case = self
      .store
      .get_case(case_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(messages::case_missing(case_id)))?;
    Ok(CaseDto::from(&case))
  }

  pub async fn cases_for_person(&self, person_id: PersonId) -> Result<Vec<CaseDto>> {
    self
      .store
      .get_person(person_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(messages::person_missing(person_id)))?;

    let cases = self
      .store
      .cases_by_person(person_id)
      .await
      .map_err(Error::store)?;
    Ok(cases.iter().map(CaseDto::from).collect())
  }

  fn announce(&self, message: String) {
    notify::dispatch(
      self.notifier.as_ref(),
      &Notification::new(self.settings.sender.as_str(), message),
    );
  }
}

/// Render an aggregate invariant violation as a service error.
fn invariant_error(violation: InvariantViolation, trailer: Option<&str>) -> Error {
  match violation {
    InvariantViolation::NoFacts => {
      Error::Invalid(Violations::single(messages::AT_LEAST_ONE_FACT))
    }
    InvariantViolation::DuplicateFacts(ids) => {
      let mut conflicts: Violations = ids
        .iter()
        .map(messages::fact_already_attached)
        .collect::<Vec<_>>()
        .into();
      if let Some(trailer) = trailer {
        conflicts.push(trailer);
      }
      Error::Conflict(conflicts)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    id::FactId,
    store::CaseStore,
    testing::{FailingNotifier, MemoryStore, RecordingNotifier, seed_fact, seed_person},
  };

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() }

  fn settings() -> CaseSettings {
    CaseSettings { today: day, ..CaseSettings::default() }
  }

  fn service(
    store: &Arc<MemoryStore>,
  ) -> (CaseService<MemoryStore, RecordingNotifier>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (CaseService::new(Arc::clone(store), Arc::clone(&notifier), settings()), notifier)
  }

  fn request(person: i64, facts: &[i64]) -> NewCaseRequest {
    NewCaseRequest {
      violation_date: NaiveDate::from_ymd_opt(2019, 2, 18).unwrap(),
      location:       Some("Leeuwarden".into()),
      person_id:      PersonId(person),
      fact_ids:       facts.iter().copied().map(FactId).collect(),
    }
  }

  fn attach(ids: &[i64]) -> Vec<AttachFactRequest> {
    ids.iter().map(|&id| AttachFactRequest { fact_id: FactId(id) }).collect()
  }

  async fn case_with_fact_one(store: &Arc<MemoryStore>) -> CaseDto {
    let (svc, _) = service(store);
    svc.create_case(request(1, &[1])).await.unwrap()
  }

  // ── Create ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_case_reports_every_missing_reference() {
    let store = Arc::new(MemoryStore::default());
    let (svc, notifier) = service(&store);

    let err = svc.create_case(request(1, &[1, 2])).await.unwrap_err();

    match err {
      Error::NotFound(v) => assert_eq!(
        v.messages(),
        &["Persoonnr 1 bestaat niet", "Feitnr 1 bestaat niet", "Feitnr 2 bestaat niet"]
      ),
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.list_cases().await.unwrap().is_empty());
    assert!(notifier.messages().is_empty());
  }

  #[tokio::test]
  async fn create_case_lists_missing_facts_in_request_order() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    let (svc, _) = service(&store);

    let err = svc.create_case(request(1, &[9, 1, 4])).await.unwrap_err();
    assert_eq!(err.messages(), vec!["Feitnr 9 bestaat niet", "Feitnr 4 bestaat niet"]);
  }

  #[tokio::test]
  async fn create_case_seeds_open_status() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    seed_fact(&store, "VBF-002");
    let (svc, notifier) = service(&store);

    let dto = svc.create_case(request(1, &[2, 1])).await.unwrap();

    assert_eq!(dto.case_id, Some(CaseId(1)));
    assert_eq!(dto.fact_ids, vec![FactId(2), FactId(1)]);
    assert_eq!(dto.status_history_ids.len(), 1);

    let stored = store.get_case(CaseId(1)).await.unwrap().unwrap();
    let first = stored.current_status().unwrap();
    assert_eq!(first.status, Status::new(StatusId(1), "Open"));
    assert_eq!(first.changed_on, day());
    assert_eq!(notifier.messages().len(), 1);
  }

  #[tokio::test]
  async fn create_case_survives_failing_notifier() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    let svc = CaseService::new(Arc::clone(&store), Arc::new(FailingNotifier), settings());

    let dto = svc.create_case(request(1, &[1])).await.unwrap();
    assert_eq!(dto.case_id, Some(CaseId(1)));
  }

  #[tokio::test]
  async fn create_case_rejects_repeated_fact() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    let (svc, _) = service(&store);

    let err = svc.create_case(request(1, &[1, 1])).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert!(store.list_cases().await.unwrap().is_empty());
  }

  // ── Status ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn append_status_reports_case_before_status() {
    let store = Arc::new(MemoryStore::default());
    let (svc, _) = service(&store);

    let err = svc.append_status(CaseId(5), StatusId(8)).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(
      err.messages(),
      vec!["ZaakNummer: 5 bestaat niet", "StatusNummer: 8 bestaat niet"]
    );
  }

  #[tokio::test]
  async fn append_status_only_grows_history() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    store.seed_status("In behandeling");
    let created = case_with_fact_one(&store).await;
    let before = store.get_case(CaseId(1)).await.unwrap().unwrap();

    let (svc, _) = service(&store);
    let dto = svc.append_status(CaseId(1), StatusId(2)).await.unwrap();

    let after = store.get_case(CaseId(1)).await.unwrap().unwrap();
    let (old, new) = (before.status_history(), after.status_history());
    assert_eq!(new.len(), old.len() + 1);
    assert_eq!(&new[..old.len()], old);
    assert_eq!(after.current_status().unwrap().status.description, "In behandeling");
    assert_eq!(dto.status_history_ids[..1], created.status_history_ids[..]);
    assert_eq!(dto.status_history_ids.len(), 2);
  }

  #[tokio::test]
  async fn append_unknown_status_leaves_case_untouched() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    let err = svc.append_status(CaseId(1), StatusId(42)).await.unwrap_err();
    assert_eq!(err.messages(), vec!["StatusNummer: 42 bestaat niet"]);
    let stored = store.get_case(CaseId(1)).await.unwrap().unwrap();
    assert_eq!(stored.status_history().len(), 1);
  }

  // ── Facts ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn attach_duplicate_fact_is_conflict_and_attaches_nothing() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    seed_fact(&store, "VBF-002");
    case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    let err = svc.attach_facts(CaseId(1), &attach(&[1, 2])).await.unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(
      err.messages(),
      vec!["feitNummer: 1 is reeds toegevoegd aan deze zaak", "geen feit(en) toegevoegd"]
    );
    let stored = store.get_case(CaseId(1)).await.unwrap().unwrap();
    assert_eq!(stored.facts().len(), 1);
  }

  #[tokio::test]
  async fn attach_lists_every_conflict() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    seed_fact(&store, "VBF-002");
    seed_fact(&store, "VBF-003");
    let (svc, _) = service(&store);
    svc.create_case(request(1, &[1, 2])).await.unwrap();

    let err = svc.attach_facts(CaseId(1), &attach(&[3, 2, 1])).await.unwrap_err();
    assert_eq!(
      err.messages(),
      vec![
        "feitNummer: 2 is reeds toegevoegd aan deze zaak",
        "feitNummer: 1 is reeds toegevoegd aan deze zaak",
        "geen feit(en) toegevoegd",
      ]
    );
  }

  #[tokio::test]
  async fn attach_missing_fact_is_not_found_and_attaches_nothing() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    seed_fact(&store, "VBF-002");
    case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    let err = svc.attach_facts(CaseId(1), &attach(&[2, 3])).await.unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(
      err.messages(),
      vec!["feitNummer: 3 bestaat niet", "geen feit(en) toegevoegd"]
    );
    let stored = store.get_case(CaseId(1)).await.unwrap().unwrap();
    assert_eq!(stored.facts().len(), 1);
  }

  #[tokio::test]
  async fn attach_to_missing_case_reports_case_first() {
    let store = Arc::new(MemoryStore::default());
    let (svc, _) = service(&store);

    let err = svc.attach_facts(CaseId(7), &attach(&[1])).await.unwrap_err();
    assert_eq!(
      err.messages(),
      vec![
        "zaakNummer: 7 bestaat niet",
        "feitNummer: 1 bestaat niet",
        "geen feit(en) toegevoegd",
      ]
    );
  }

  #[tokio::test]
  async fn attach_appends_each_fact_once() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    for code in ["VBF-001", "VBF-002", "VBF-003"] {
      seed_fact(&store, code);
    }
    let before = case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    let after = svc.attach_facts(CaseId(1), &attach(&[3, 2])).await.unwrap();

    assert_eq!(after.fact_ids.len(), before.fact_ids.len() + 2);
    assert_eq!(after.fact_ids, vec![FactId(1), FactId(3), FactId(2)]);
  }

  #[tokio::test]
  async fn attach_nothing_is_invalid() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    let err = svc.attach_facts(CaseId(1), &[]).await.unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
  }

  #[tokio::test]
  async fn attach_racing_another_writer_is_conflict() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_fact(&store, "VBF-001");
    let second = seed_fact(&store, "VBF-002");
    case_with_fact_one(&store).await;
    let (svc, _) = service(&store);

    store.link_before_next_save(CaseId(1), second);
    let err = svc.attach_facts(CaseId(1), &attach(&[2])).await.unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(
      err.messages(),
      vec!["feitNummer: 2 is reeds toegevoegd aan deze zaak", "geen feit(en) toegevoegd"]
    );
    let stored = store.get_case(CaseId(1)).await.unwrap().unwrap();
    assert_eq!(stored.facts().len(), 2);
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_missing_case_is_not_found() {
    let store = Arc::new(MemoryStore::default());
    let (svc, _) = service(&store);

    let err = svc.get_case(CaseId(3)).await.unwrap_err();
    assert_eq!(err.messages(), vec!["ZaakNummer: 3 bestaat niet"]);
  }

  #[tokio::test]
  async fn cases_for_person_requires_person() {
    let store = Arc::new(MemoryStore::default());
    let (svc, _) = service(&store);

    let err = svc.cases_for_person(PersonId(2)).await.unwrap_err();
    assert_eq!(err.messages(), vec!["Persoonnr 2 bestaat niet"]);
  }

  #[tokio::test]
  async fn cases_for_person_filters_by_person() {
    let store = Arc::new(MemoryStore::default());
    seed_person(&store, "123456789");
    seed_person(&store, "987654321");
    seed_fact(&store, "VBF-001");
    let (svc, _) = service(&store);
    svc.create_case(request(1, &[1])).await.unwrap();
    svc.create_case(request(2, &[1])).await.unwrap();
    svc.create_case(request(1, &[1])).await.unwrap();

    let mine = svc.cases_for_person(PersonId(1)).await.unwrap();
    let ids: Vec<_> = mine.iter().map(|c| c.case_id).collect();
    assert_eq!(ids, vec![Some(CaseId(1)), Some(CaseId(3))]);
    assert_eq!(svc.list_cases().await.unwrap().len(), 3);
  }
}
