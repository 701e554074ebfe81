//! amble command-line entry point.
//!
//! Logging goes to stderr so rendered output on stdout stays clean.

use amble_core::AppConfig;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod render;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::debug!(db_path = %config.db_path.display(), api = %config.api_base_url, "configuration loaded");

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args, &config).await,
        Commands::Cache => commands::cache::execute(&config).await,
        Commands::Settings(args) => commands::settings::execute(args, &config).await,
        Commands::Tilt(args) => commands::tilt::execute(args, &config).await,
        Commands::Members(args) => commands::members::execute(args),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
