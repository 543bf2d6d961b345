//! The notification port: a fire-and-forget side channel telling other
//! systems about person and case activity.
//!
//! Services dispatch a [`Notification`] only after their primary operation
//! has committed. A failed dispatch is logged and otherwise ignored; it never
//! turns into an operation error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The payload handed to a [`Notifier`], serialised as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub event_id: Uuid,
  pub sender:   String,
  pub message:  String,
  pub sent_at:  DateTime<Utc>,
}

impl Notification {
  pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      event_id: Uuid::new_v4(),
      sender:   sender.into(),
      message:  message.into(),
      sent_at:  Utc::now(),
    }
  }
}

/// A best-effort message sink.
///
/// `send` must not block and must not retry; no acknowledgement is consumed.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(&self, message: &str) -> Result<(), Self::Error>;
}

/// A notifier that drops every message. Useful when no downstream system is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardNotifier;

impl Notifier for DiscardNotifier {
  type Error = std::convert::Infallible;

  fn send(&self, _message: &str) -> Result<(), Self::Error> { Ok(()) }
}

/// Serialise and dispatch `notification`, logging instead of failing.
pub(crate) fn dispatch<N: Notifier>(notifier: &N, notification: &Notification) {
  let payload = match serde_json::to_string(notification) {
    Ok(p) => p,
    Err(e) => {
      tracing::warn!(error = %e, "failed to encode notification");
      return;
    }
  };
  if let Err(e) = notifier.send(&payload) {
    tracing::warn!(
      error = %e,
      event_id = %notification.event_id,
      "notification not delivered"
    );
  }
}
