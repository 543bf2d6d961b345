//! Handlers for `/personen` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/personen` | |
//! | `POST` | `/personen` | Body: [`PersonBody`]; returns 201 + stored person |
//! | `GET`  | `/personen/{id}` | 404 if not found |
//! | `PUT`  | `/personen/{id}` | Body: [`PersonBody`]; replaces every field |
//! | `GET`  | `/personen/{id}/zaken` | Cases of one person |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use boete_core::{
  id::PersonId,
  notify::Notifier,
  person::Person,
  projection::CaseDto,
  store::EntityStore,
};

use crate::{
  AppState,
  error::ApiError,
  validation::{Body, PersonBody},
};

/// `GET /personen`
pub async fn list<S, N>(
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.persons.list_persons().await?))
}

/// `POST /personen`
pub async fn create<S, N>(
  State(state): State<AppState<S, N>>,
  Body(body): Body<PersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  let person = state.persons.add_person(body.validate()?).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /personen/{id}`
pub async fn get_one<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.persons.get_person(id).await?))
}

/// `PUT /personen/{id}`
pub async fn update<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<PersonId>,
  Body(body): Body<PersonBody>,
) -> Result<Json<Person>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.persons.update_person(id, body.validate()?).await?))
}

/// `GET /personen/{id}/zaken`
pub async fn cases<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<CaseDto>>, ApiError>
where
  S: EntityStore,
  N: Notifier,
{
  Ok(Json(state.cases.cases_for_person(id).await?))
}
