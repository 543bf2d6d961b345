//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use boete_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"error": ["msg", ...]}`, one entry per
/// violation, in the order they were found.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] Error),

  /// The body could not be parsed into the expected shape at all.
  #[error("malformed body: {0}")]
  Malformed(#[from] JsonRejection),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Service(Error::Invalid(_)) => StatusCode::BAD_REQUEST,
      ApiError::Service(Error::NotFound(_)) => StatusCode::NOT_FOUND,
      ApiError::Service(Error::Conflict(_)) => StatusCode::CONFLICT,
      ApiError::Service(Error::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let messages = match &self {
      ApiError::Service(e) => e.messages(),
      ApiError::Malformed(r) => vec![r.body_text()],
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": messages }))).into_response()
  }
}
