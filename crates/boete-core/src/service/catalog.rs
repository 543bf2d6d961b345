//! [`CatalogService`]: the fact and status reference catalogs.

use std::sync::Arc;

use tracing::info;

use super::messages;
use crate::{
  Error, Result,
  fact::{Fact, NewFact},
  id::{FactId, StatusId},
  status::Status,
  store::{FactStore, StatusStore},
};

pub struct CatalogService<S> {
  store: Arc<S>,
}

impl<S> Clone for CatalogService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S> CatalogService<S>
where
  S: FactStore + StatusStore,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ── Facts ─────────────────────────────────────────────────────────────

  pub async fn list_facts(&self) -> Result<Vec<Fact>> {
    self.store.list_facts().await.map_err(Error::store)
  }

  pub async fn get_fact(&self, fact_id: FactId) -> Result<Fact> {
    self
      .store
      .get_fact(fact_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(messages::catalog_fact_missing(fact_id)))
  }

  pub async fn add_fact(&self, input: NewFact) -> Result<Fact> {
    let fact = self.store.add_fact(input).await.map_err(Error::store)?;
    info!(fact_id = %fact.fact_id, code = %fact.code, "fact added");
    Ok(fact)
  }

  // ── Statuses ──────────────────────────────────────────────────────────

  pub async fn list_statuses(&self) -> Result<Vec<Status>> {
    self.store.list_statuses().await.map_err(Error::store)
  }

  pub async fn get_status(&self, status_id: StatusId) -> Result<Status> {
    self
      .store
      .get_status(status_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(messages::status_missing(status_id)))
  }

  pub async fn add_status(&self, description: String) -> Result<Status> {
    let status = self.store.add_status(description).await.map_err(Error::store)?;
    info!(status_id = %status.status_id, "status added");
    Ok(status)
  }
}
