//! The violation collector shared by every multi-entity operation.
//!
//! An operation runs in phases. Within a phase every violation is pushed
//! onto one [`Violations`]; at the end of the phase the collector is checked
//! with [`Violations::finish`], which turns a non-empty list into the
//! operation's terminal failure. A failed phase never falls through to the
//! next one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An ordered list of human-readable violation messages.
///
/// Renders as `[first, second, ...]`, but callers that need the individual
/// messages (e.g. for a structured HTTP body) should use
/// [`Violations::messages`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<String>);

impl Violations {
  pub fn new() -> Self { Self::default() }

  /// A collector holding exactly one message; used by fail-fast lookups.
  pub fn single(message: impl Into<String>) -> Self {
    Self(vec![message.into()])
  }

  pub fn push(&mut self, message: impl Into<String>) {
    self.0.push(message.into());
  }

  /// Record `message` when `value` is `None`, passing the value through.
  ///
  /// This is the resolution step of a phase: map an identifier lookup to an
  /// optional entity and note the miss without stopping.
  pub fn require<T>(
    &mut self,
    value: Option<T>,
    message: impl FnOnce() -> String,
  ) -> Option<T> {
    if value.is_none() {
      self.0.push(message());
    }
    value
  }

  /// Record `message` when `condition` holds.
  pub fn reject_if(&mut self, condition: bool, message: impl FnOnce() -> String) {
    if condition {
      self.0.push(message());
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn messages(&self) -> &[String] { &self.0 }

  pub fn into_messages(self) -> Vec<String> { self.0 }

  /// Append a fixed closing message, returning the collector.
  pub fn with_trailer(mut self, trailer: impl Into<String>) -> Self {
    self.0.push(trailer.into());
    self
  }

  /// Terminal check for a phase: `Ok(())` when nothing was recorded,
  /// otherwise the error produced by `fail`.
  pub fn finish(self, fail: impl FnOnce(Self) -> Error) -> Result<()> {
    if self.is_empty() { Ok(()) } else { Err(fail(self)) }
  }

  /// Terminal check that also hands back what the phase resolved.
  ///
  /// `resolved` is expected to be `Some` whenever nothing was recorded; a
  /// `None` is reported through `fail` all the same.
  pub fn finish_with<T>(
    self,
    resolved: Option<T>,
    fail: impl FnOnce(Self) -> Error,
  ) -> Result<T> {
    match resolved {
      Some(value) if self.is_empty() => Ok(value),
      _ => Err(fail(self)),
    }
  }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.0.join(", "))
  }
}

impl From<Vec<String>> for Violations {
  fn from(messages: Vec<String>) -> Self { Self(messages) }
}

impl IntoIterator for Violations {
  type Item = String;
  type IntoIter = std::vec::IntoIter<String>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}
