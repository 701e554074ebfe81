//! Subcommand implementations.

pub mod cache;
pub mod members;
pub mod resolve;
pub mod settings;
pub mod tilt;

use amble_core::{AppConfig, SqliteStore};
use anyhow::{Context, Result};

/// Open the configured key-value store.
pub(crate) async fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))
}
