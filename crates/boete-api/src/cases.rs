//! Handlers for `/zaken` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/zaken` | |
//! | `POST` | `/zaken` | Body: [`CaseBody`]; returns 201 + case projection |
//! | `GET`  | `/zaken/{id}` | 404 if not found |
//! | `PUT`  | `/zaken/{id}/status` | Body: `{"status_id":n}` |
//! | `PUT`  | `/zaken/{id}/feiten` | Body: `[{"fact_id":n}, ...]`, all-or-nothing |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use boete_core::{
  id::CaseId,
  notify::Notifier,
  projection::{AppendStatusRequest, AttachFactRequest, CaseDto},
  store::EntityStore,
};

use crate::{
  AppState,
  error::ApiError,
  validation::{Body, CaseBody, validate_attach},
};

/// `GET /zaken`
pub async fn list<S, N>(
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<CaseDto>>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.cases.list_cases().await?))
}

/// `POST /zaken`
pub async fn create<S, N>(
  State(state): State<AppState<S, N>>,
  Body(body): Body<CaseBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  let case = state.cases.create_case(body.validate()?).await?;
  Ok((StatusCode::CREATED, Json(case)))
}

/// `GET /zaken/{id}`
pub async fn get_one<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<CaseId>,
) -> Result<Json<CaseDto>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.cases.get_case(id).await?))
}

/// `PUT /zaken/{id}/status`
pub async fn append_status<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<CaseId>,
  Body(body): Body<AppendStatusRequest>,
) -> Result<Json<CaseDto>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.cases.append_status(id, body.status_id).await?))
}

/// `PUT /zaken/{id}/feiten`
pub async fn attach_facts<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<CaseId>,
  Body(body): Body<Vec<AttachFactRequest>>,
) -> Result<Json<CaseDto>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  let requests = validate_attach(body)?;
  Ok(Json(state.cases.attach_facts(id, &requests).await?))
}
