//! Handlers for the reference catalogs.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feiten` | |
//! | `POST` | `/feiten` | Body: [`FactBody`]; returns 201 |
//! | `GET`  | `/feiten/{id}` | 404 if not found |
//! | `GET`  | `/statussen` | |
//! | `POST` | `/statussen` | Body: `{"description":"..."}`; returns 201 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use boete_core::{
  fact::Fact,
  id::FactId,
  notify::Notifier,
  status::Status,
  store::EntityStore,
};

use crate::{
  AppState,
  error::ApiError,
  validation::{Body, FactBody, StatusBody},
};

// ─── Facts ────────────────────────────────────────────────────────────────────

/// `GET /feiten`
pub async fn list_facts<S, N>(
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Fact>>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.catalog.list_facts().await?))
}

/// `POST /feiten`
pub async fn create_fact<S, N>(
  State(state): State<AppState<S, N>>,
  Body(body): Body<FactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  let fact = state.catalog.add_fact(body.validate()?).await?;
  Ok((StatusCode::CREATED, Json(fact)))
}

/// `GET /feiten/{id}`
pub async fn get_fact<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<FactId>,
) -> Result<Json<Fact>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.catalog.get_fact(id).await?))
}

// ─── Statuses ─────────────────────────────────────────────────────────────────

/// `GET /statussen`
pub async fn list_statuses<S, N>(
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Status>>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.catalog.list_statuses().await?))
}

/// `POST /statussen`
pub async fn create_status<S, N>(
  State(state): State<AppState<S, N>>,
  Body(body): Body<StatusBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  let status = state.catalog.add_status(body.validate()?).await?;
  Ok((StatusCode::CREATED, Json(status)))
}
