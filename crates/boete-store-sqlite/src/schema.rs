//! SQL schema for the Boete SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` / `OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    street        TEXT NOT NULL,
    house_number  TEXT NOT NULL,
    postcode      TEXT NOT NULL,
    city          TEXT NOT NULL,
    bsn           TEXT NOT NULL UNIQUE,
    birth_date    TEXT NOT NULL      -- ISO 8601 date
);

CREATE TABLE IF NOT EXISTS facts (
    fact_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    code          TEXT NOT NULL,
    description   TEXT NOT NULL,
    amount        TEXT NOT NULL      -- decimal as text, never negative
);

CREATE TABLE IF NOT EXISTS statuses (
    status_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    description   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cases (
    case_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    violation_date TEXT NOT NULL,
    location       TEXT,             -- NULL for administrative cases
    person_id      INTEGER NOT NULL REFERENCES persons(person_id)
);

-- Fact links are only ever inserted; `position` keeps attachment order.
CREATE TABLE IF NOT EXISTS case_facts (
    case_id   INTEGER NOT NULL REFERENCES cases(case_id),
    fact_id   INTEGER NOT NULL REFERENCES facts(fact_id),
    position  INTEGER NOT NULL,
    PRIMARY KEY (case_id, fact_id)
);

-- Status history is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS case_statuses (
    entry_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    case_id     INTEGER NOT NULL REFERENCES cases(case_id),
    status_id   INTEGER NOT NULL REFERENCES statuses(status_id),
    changed_on  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_person_idx        ON cases(person_id);
CREATE INDEX IF NOT EXISTS case_statuses_case_idx  ON case_statuses(case_id);

-- Well-known status every new case starts in.
INSERT OR IGNORE INTO statuses (status_id, description) VALUES (1, 'Open');

PRAGMA user_version = 1;
";
