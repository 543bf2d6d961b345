//! Error types for `boete-core`.

use thiserror::Error;

use crate::Violations;

/// The failure taxonomy shared by every service operation.
///
/// The first three variants carry the full ordered list of violations found
/// in the failing phase, never just the first one.
#[derive(Debug, Error)]
pub enum Error {
  /// One or more referenced identifiers do not exist.
  #[error("not found: {0}")]
  NotFound(Violations),

  /// A uniqueness rule was violated (duplicate fact on a case, duplicate BSN).
  #[error("conflict: {0}")]
  Conflict(Violations),

  /// Field-level constraint violations on inbound data.
  #[error("invalid input: {0}")]
  Invalid(Violations),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(message: impl Into<String>) -> Self {
    Self::NotFound(Violations::single(message))
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::Conflict(Violations::single(message))
  }

  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// The individual messages, in the order they were recorded.
  pub fn messages(&self) -> Vec<String> {
    match self {
      Self::NotFound(v) | Self::Conflict(v) | Self::Invalid(v) => {
        v.messages().to_vec()
      }
      Self::Store(e) => vec![e.to_string()],
    }
  }
}

/// Implemented by store backend errors so the services can tell a uniqueness
/// violation on write apart from any other failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_conflict(&self) -> bool;
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
