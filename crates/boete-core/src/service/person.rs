//! [`PersonService`]: the person registry.

use std::sync::Arc;

use tracing::info;

use super::{messages, write_error};
use crate::{
  Error, Result,
  id::PersonId,
  notify::{self, Notification, Notifier},
  person::{NewPerson, Person},
  store::PersonStore,
};

pub struct PersonService<S, N> {
  store:    Arc<S>,
  notifier: Arc<N>,
  sender:   Arc<str>,
}

impl<S, N> Clone for PersonService<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
      sender:   Arc::clone(&self.sender),
    }
  }
}

impl<S, N> PersonService<S, N>
where
  S: PersonStore,
  N: Notifier,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, sender: impl Into<Arc<str>>) -> Self {
    Self { store, notifier, sender: sender.into() }
  }

  pub async fn list_persons(&self) -> Result<Vec<Person>> {
    self.store.list_persons().await.map_err(Error::store)
  }

  /// Register a new person. The BSN must not be in use yet.
  pub async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let bsn = input.bsn.clone();
    let person = self
      .store
      .add_person(input)
      .await
      .map_err(|e| write_error(e, || messages::bsn_taken(&bsn)))?;

    info!(person_id = %person.person_id, "person added");
    self.announce("Persoon toegevoegd".to_owned());
    Ok(person)
  }

  pub async fn get_person(&self, person_id: PersonId) -> Result<Person> {
    let person = self
      .store
      .get_person(person_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(messages::person_number_missing(person_id)))?;

    self.announce(format!("Persoon {person_id} opgevraagd"));
    Ok(person)
  }

  /// Replace every field of an existing person except its identifier.
  pub async fn update_person(
    &self,
    person_id: PersonId,
    input: NewPerson,
  ) -> Result<Person> {
    let bsn = input.bsn.clone();
    let person = self
      .store
      .update_person(input.with_id(person_id))
      .await
      .map_err(|e| write_error(e, || messages::bsn_taken(&bsn)))?
      .ok_or_else(|| Error::not_found(messages::person_number_missing(person_id)))?;

    info!(%person_id, "person updated");
    Ok(person)
  }

  fn announce(&self, message: String) {
    notify::dispatch(
      self.notifier.as_ref(),
      &Notification::new(self.sender.as_ref(), message),
    );
  }
}
