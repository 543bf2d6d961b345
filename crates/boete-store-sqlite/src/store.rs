//! [`SqliteStore`]: the SQLite implementation of the entity store traits.

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;

use boete_core::{
  case::Case,
  fact::{Fact, NewFact},
  id::{CaseId, EntryId, FactId, PersonId, StatusId},
  person::{NewPerson, Person},
  status::Status,
  store::{CaseStore, FactStore, PersonStore, StatusStore, Store},
};

use crate::{
  encode::{encode_amount, encode_date, RawCase, RawEntry, RawFact, RawPerson},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Boete entity store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load every case whose id is produced by `ids_sql`, in id order.
  async fn load_cases(
    &self,
    ids_sql: &'static str,
    params: Vec<i64>,
  ) -> Result<Vec<Case>> {
    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(ids_sql)?;
        let ids = stmt
          .query_map(rusqlite::params_from_iter(params), |r| r.get::<_, i64>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut raws = Vec::with_capacity(ids.len());
        for id in ids {
          if let Some(raw) = read_case(conn, id)? {
            raws.push(raw);
          }
        }
        Ok(raws)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }
}

/// Read one case with its person, facts (attachment order) and status
/// history (entry order).
fn read_case(
  conn: &rusqlite::Connection,
  case_id: i64,
) -> rusqlite::Result<Option<RawCase>> {
  let head = conn
    .query_row(
      &format!(
        "SELECT c.case_id, c.violation_date, c.location, {}
         FROM cases c JOIN persons p ON p.person_id = c.person_id
         WHERE c.case_id = ?1",
        RawPerson::COLUMNS
      ),
      rusqlite::params![case_id],
      |r| {
        Ok((
          r.get::<_, i64>(0)?,
          r.get::<_, String>(1)?,
          r.get::<_, Option<String>>(2)?,
          RawPerson::read(r, 3)?,
        ))
      },
    )
    .optional()?;

  let Some((case_id, violation_date, location, person)) = head else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM case_facts cf JOIN facts f ON f.fact_id = cf.fact_id
     WHERE cf.case_id = ?1 ORDER BY cf.position",
    RawFact::COLUMNS
  ))?;
  let facts = stmt
    .query_map(rusqlite::params![case_id], RawFact::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT cs.entry_id, cs.changed_on, s.status_id, s.description
     FROM case_statuses cs JOIN statuses s ON s.status_id = cs.status_id
     WHERE cs.case_id = ?1 ORDER BY cs.entry_id",
  )?;
  let history = stmt
    .query_map(rusqlite::params![case_id], |r| {
      Ok(RawEntry {
        entry_id:           r.get(0)?,
        changed_on:         r.get(1)?,
        status_id:          r.get(2)?,
        status_description: r.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(RawCase { case_id, violation_date, location, person, facts, history }))
}

/// Insert the status entries that have no id yet, returning the new ids in
/// order.
fn insert_entries(
  tx: &rusqlite::Transaction<'_>,
  case_id: i64,
  entries: &[(i64, String)],
) -> rusqlite::Result<Vec<i64>> {
  let mut stmt = tx.prepare(
    "INSERT INTO case_statuses (case_id, status_id, changed_on) VALUES (?1, ?2, ?3)",
  )?;
  let mut ids = Vec::with_capacity(entries.len());
  for (status_id, changed_on) in entries {
    stmt.execute(rusqlite::params![case_id, status_id, changed_on])?;
    ids.push(tx.last_insert_rowid());
  }
  Ok(ids)
}

/// Values of a [`Case`] flattened for the write closures.
struct CaseRows {
  violation_date: String,
  location:       Option<String>,
  person_id:      i64,
  /// Facts not yet linked, in attachment order.
  new_fact_ids:   Vec<i64>,
  new_entries:    Vec<(i64, String)>,
}

impl CaseRows {
  fn of(case: &Case) -> Self {
    Self {
      violation_date: encode_date(case.violation_date()),
      location:       case.location().map(str::to_owned),
      person_id:      case.person().person_id.get(),
      new_fact_ids:   case.unsaved_facts().iter().map(|f| f.fact_id.get()).collect(),
      new_entries:    case
        .status_history()
        .iter()
        .filter(|e| !e.is_persisted())
        .map(|e| (e.status.status_id.get(), encode_date(e.changed_on)))
        .collect(),
    }
  }
}

fn entry_ids(ids: Vec<i64>) -> Vec<EntryId> { ids.into_iter().map(EntryId).collect() }

// ─── Trait impls ─────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = Error;
}

// ── Persons ──────────────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {} FROM persons p WHERE p.person_id = ?1", RawPerson::COLUMNS),
            rusqlite::params![id.get()],
            |r| RawPerson::read(r, 0),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM persons p ORDER BY p.person_id",
          RawPerson::COLUMNS
        ))?;
        let raws = stmt
          .query_map([], |r| RawPerson::read(r, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let birth_date = encode_date(input.birth_date);
    let row = input.clone();

    let person_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             first_name, last_name, street, house_number,
             postcode, city, bsn, birth_date
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            row.first_name,
            row.last_name,
            row.street,
            row.house_number,
            row.postcode,
            row.city,
            row.bsn,
            birth_date,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::classify)?;

    Ok(input.with_id(PersonId(person_id)))
  }

  async fn update_person(&self, person: Person) -> Result<Option<Person>> {
    let birth_date = encode_date(person.birth_date);
    let row = person.clone();

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE persons SET
             first_name = ?1, last_name = ?2, street = ?3, house_number = ?4,
             postcode = ?5, city = ?6, bsn = ?7, birth_date = ?8
           WHERE person_id = ?9",
          rusqlite::params![
            row.first_name,
            row.last_name,
            row.street,
            row.house_number,
            row.postcode,
            row.city,
            row.bsn,
            birth_date,
            row.person_id.get(),
          ],
        )?;
        Ok(n)
      })
      .await
      .map_err(Error::classify)?;

    Ok((changed > 0).then_some(person))
  }
}

// ── Facts ────────────────────────────────────────────────────────────────────

impl FactStore for SqliteStore {
  async fn get_fact(&self, id: FactId) -> Result<Option<Fact>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {} FROM facts f WHERE f.fact_id = ?1", RawFact::COLUMNS),
            rusqlite::params![id.get()],
            RawFact::read,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawFact::into_fact).transpose()
  }

  async fn list_facts(&self) -> Result<Vec<Fact>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM facts f ORDER BY f.fact_id",
          RawFact::COLUMNS
        ))?;
        let raws = stmt
          .query_map([], RawFact::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn add_fact(&self, input: NewFact) -> Result<Fact> {
    let code        = input.code.clone();
    let description = input.description.clone();
    let amount      = encode_amount(input.amount);

    let fact_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO facts (code, description, amount) VALUES (?1, ?2, ?3)",
          rusqlite::params![code, description, amount],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::classify)?;

    Ok(input.with_id(FactId(fact_id)))
  }
}

// ── Statuses ─────────────────────────────────────────────────────────────────

impl StatusStore for SqliteStore {
  async fn get_status(&self, id: StatusId) -> Result<Option<Status>> {
    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT description FROM statuses WHERE status_id = ?1",
            rusqlite::params![id.get()],
            |r| r.get::<_, String>(0),
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    Ok(row.map(|description| Status::new(id, description)))
  }

  async fn list_statuses(&self) -> Result<Vec<Status>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT status_id, description FROM statuses ORDER BY status_id")?;
        let rows = stmt
          .query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows
      .into_iter()
      .map(|(id, description)| Status::new(StatusId(id), description))
      .collect())
  }

  async fn add_status(&self, description: String) -> Result<Status> {
    let row = description.clone();
    let status_id = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO statuses (description) VALUES (?1)", rusqlite::params![row])?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::classify)?;

    Ok(Status::new(StatusId(status_id), description))
  }
}

// ── Cases ────────────────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  async fn get_case(&self, id: CaseId) -> Result<Option<Case>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_case(conn, id.get())?))
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn list_cases(&self) -> Result<Vec<Case>> {
    self.load_cases("SELECT case_id FROM cases ORDER BY case_id", Vec::new()).await
  }

  async fn cases_by_person(&self, person_id: PersonId) -> Result<Vec<Case>> {
    self
      .load_cases(
        "SELECT case_id FROM cases WHERE person_id = ?1 ORDER BY case_id",
        vec![person_id.get()],
      )
      .await
  }

  async fn add_case(&self, mut case: Case) -> Result<Case> {
    let rows = CaseRows::of(&case);

    let (case_id, ids) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO cases (violation_date, location, person_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![rows.violation_date, rows.location, rows.person_id],
        )?;
        let case_id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO case_facts (case_id, fact_id, position) VALUES (?1, ?2, ?3)",
          )?;
          for (position, fact_id) in rows.new_fact_ids.iter().enumerate() {
            stmt.execute(rusqlite::params![case_id, fact_id, position as i64])?;
          }
        }

        let ids = insert_entries(&tx, case_id, &rows.new_entries)?;
        tx.commit()?;
        Ok((case_id, ids))
      })
      .await
      .map_err(Error::classify)?;

    case.assign_ids(CaseId(case_id), &entry_ids(ids));
    Ok(case)
  }

  async fn save_case(&self, mut case: Case) -> Result<Case> {
    let Some(case_id) = case.case_id() else {
      return self.add_case(case).await;
    };
    let rows = CaseRows::of(&case);

    let ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Unsaved facts go after every stored link. A fact some other writer
        // linked in the meantime hits the primary key and surfaces as a
        // conflict.
        let next: i64 = tx.query_row(
          "SELECT COALESCE(MAX(position) + 1, 0) FROM case_facts WHERE case_id = ?1",
          rusqlite::params![case_id.get()],
          |r| r.get(0),
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO case_facts (case_id, fact_id, position) VALUES (?1, ?2, ?3)",
          )?;
          for (offset, fact_id) in rows.new_fact_ids.iter().enumerate() {
            stmt.execute(rusqlite::params![case_id.get(), fact_id, next + offset as i64])?;
          }
        }

        let ids = insert_entries(&tx, case_id.get(), &rows.new_entries)?;
        tx.commit()?;
        Ok(ids)
      })
      .await
      .map_err(Error::classify)?;

    case.assign_ids(case_id, &entry_ids(ids));
    Ok(case)
  }
}
