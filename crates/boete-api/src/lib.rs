//! JSON REST API for the Boete case register.
//!
//! Exposes an axum [`Router`] backed by the `boete-core` services over any
//! [`EntityStore`]. Transport concerns (binding, tracing layers) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = boete_api::AppState::new(store, notifier, settings);
//! axum::serve(listener, boete_api::api_router(state)).await?;
//! ```

pub mod cases;
pub mod catalog;
pub mod error;
pub mod persons;
pub mod validation;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use boete_core::{
  notify::Notifier,
  service::{CaseService, CaseSettings, CatalogService, PersonService},
  store::EntityStore,
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// The services shared by all handlers.
pub struct AppState<S, N> {
  pub persons: PersonService<S, N>,
  pub catalog: CatalogService<S>,
  pub cases:   CaseService<S, N>,
}

impl<S, N> Clone for AppState<S, N> {
  fn clone(&self) -> Self {
    Self {
      persons: self.persons.clone(),
      catalog: self.catalog.clone(),
      cases:   self.cases.clone(),
    }
  }
}

impl<S, N> AppState<S, N>
where
  S: EntityStore,
  N: Notifier,
{
  /// Wire every service to one store and one notifier.
  pub fn new(store: Arc<S>, notifier: Arc<N>, settings: CaseSettings) -> Self {
    Self {
      persons: PersonService::new(
        Arc::clone(&store),
        Arc::clone(&notifier),
        settings.sender.clone(),
      ),
      catalog: CatalogService::new(Arc::clone(&store)),
      cases:   CaseService::new(store, notifier, settings),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, N>(state: AppState<S, N>) -> Router<()>
where
  S: EntityStore + 'static,
  N: Notifier + 'static,
{
  Router::new()
    // Persons
    .route("/personen", get(persons::list::<S, N>).post(persons::create::<S, N>))
    .route(
      "/personen/{id}",
      get(persons::get_one::<S, N>).put(persons::update::<S, N>),
    )
    .route("/personen/{id}/zaken", get(persons::cases::<S, N>))
    // Catalogs
    .route(
      "/feiten",
      get(catalog::list_facts::<S, N>).post(catalog::create_fact::<S, N>),
    )
    .route("/feiten/{id}", get(catalog::get_fact::<S, N>))
    .route(
      "/statussen",
      get(catalog::list_statuses::<S, N>).post(catalog::create_status::<S, N>),
    )
    // Cases
    .route("/zaken", get(cases::list::<S, N>).post(cases::create::<S, N>))
    .route("/zaken/{id}", get(cases::get_one::<S, N>))
    .route("/zaken/{id}/status", put(cases::append_status::<S, N>))
    .route("/zaken/{id}/feiten", put(cases::attach_facts::<S, N>))
    .with_state(state)
}
