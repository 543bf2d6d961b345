//! boete-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `BOETE_*` environment variables, opens an in-process SQLite store, and
//! serves the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use boete_api::AppState;
use boete_core::{id::StatusId, store::StatusStore as _};
use boete_server::{ChannelNotifier, ServerConfig, notify};
use boete_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Boete case register server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let open_id = StatusId(server_cfg.open_status_id);
  let open_status = store
    .get_status(open_id)
    .await
    .context("failed to read the status catalog")?
    .with_context(|| format!("open status {open_id} does not exist in the store"))?;
  tracing::info!(status = %open_id, description = %open_status.description, "open status loaded");

  let (notifier, queue) = ChannelNotifier::channel();
  tokio::spawn(notify::listen(queue));

  let state = AppState::new(
    Arc::new(store),
    Arc::new(notifier),
    server_cfg.case_settings(open_status),
  );
  let app = boete_api::api_router(state).layer(TraceLayer::new_for_http());

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
