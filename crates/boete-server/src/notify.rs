//! In-process notification queue.
//!
//! [`ChannelNotifier`] hands every payload to an unbounded channel without
//! waiting; [`listen`] drains the other end and logs each notification.

use boete_core::notify::{Notification, Notifier};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Error)]
#[error("notification channel closed")]
pub struct NotifyError;

#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
  /// A notifier together with the receiving end of its queue.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }
}

impl Notifier for ChannelNotifier {
  type Error = NotifyError;

  fn send(&self, message: &str) -> Result<(), NotifyError> {
    self.tx.send(message.to_owned()).map_err(|_| NotifyError)
  }
}

/// Consume the queue until every sender is dropped. Returns the number of
/// payloads received.
pub async fn listen(mut rx: mpsc::UnboundedReceiver<String>) -> usize {
  let mut received = 0;
  while let Some(payload) = rx.recv().await {
    received += 1;
    match serde_json::from_str::<Notification>(&payload) {
      Ok(n) => info!(
        event_id = %n.event_id,
        sender = %n.sender,
        sent_at = %n.sent_at,
        "{}",
        n.message
      ),
      Err(e) => warn!(error = %e, %payload, "unreadable notification"),
    }
  }
  received
}
