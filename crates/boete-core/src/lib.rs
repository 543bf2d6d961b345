//! Core types, store traits and services for the Boete case register.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend and the transport layer depend on it; it depends on
//! neither.

pub mod case;
pub mod error;
pub mod fact;
pub mod id;
pub mod notify;
pub mod person;
pub mod projection;
pub mod service;
pub mod status;
pub mod store;
pub mod violations;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use violations::Violations;
