//! Error type for `boete-store-sqlite`.

use boete_core::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE or PRIMARY KEY constraint rejected the write.
  #[error("unique constraint violated: {0}")]
  Conflict(String),

  #[error("decode error: {0}")]
  Decode(String),

  /// A row referenced by a case is gone (broken foreign key).
  #[error("dangling reference: {0}")]
  Dangling(String),
}

impl Error {
  /// Turn a UNIQUE or PRIMARY KEY violation into [`Error::Conflict`], pass
  /// anything else through.
  pub(crate) fn classify(err: tokio_rusqlite::Error) -> Self {
    match &err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg))
        if matches!(
          e.extended_code,
          rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ) =>
      {
        Self::Conflict(msg.clone().unwrap_or_else(|| e.to_string()))
      }
      _ => Self::Database(err),
    }
  }
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Self::Conflict(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
