//! Runtime server configuration, deserialised from `config.toml` and
//! `BOETE_*` environment variables.

use std::path::{Path, PathBuf};

use boete_core::{service::CaseSettings, status::Status};
use serde::Deserialize;

/// Every field has a default, so an empty (or absent) file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Status every new case starts in. Must exist in the store.
  pub open_status_id:      i64,
  /// `sender` field of outgoing notifications.
  pub notification_sender: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8080,
      store_path:          PathBuf::from("boete.sqlite3"),
      open_status_id:      1,
      notification_sender: "boete-api".to_owned(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `BOETE_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BOETE").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `open_status` is the catalog row for `open_status_id`.
  pub fn case_settings(&self, open_status: Status) -> CaseSettings {
    CaseSettings {
      open_status,
      sender: self.notification_sender.clone(),
      ..CaseSettings::default()
    }
  }
}
