//! Resolve command - render project metadata for a list of targets.

use super::open_store;
use crate::cli::ResolveArgs;
use crate::render::TerminalRenderer;
use amble_client::{HttpIconLoader, MetadataFetcher, ModrinthClient, ModrinthConfig, Pacing, Resolution, Target};
use amble_core::{AppConfig, ConfigError, MetadataCache};
use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::Deserialize;
use std::path::Path;

/// Page manifest: a list of `[[target]]` tables.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    target: Vec<Target>,
}

fn load_manifest(path: &Path) -> Result<Vec<Target>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::LoadFailed(format!("manifest not found: {}", path.display())));
    }
    let manifest: Manifest = Figment::from(Toml::file(path))
        .extract()
        .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
    Ok(manifest.target)
}

/// Manifest targets first, then command-line targets, in order.
fn collect_targets(args: &ResolveArgs) -> Result<Vec<Target>> {
    let mut targets = match &args.manifest {
        Some(path) => load_manifest(path)?,
        None => Vec::new(),
    };
    targets.extend(args.targets.iter().map(|arg| Target::parse(arg)));
    Ok(targets)
}

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &AppConfig) -> Result<()> {
    let targets = collect_targets(&args)?;
    if targets.is_empty() {
        bail!("no targets given: pass slugs, links or --manifest");
    }

    let store = open_store(config).await?;
    let cache = MetadataCache::load(store, config.cache_ttl()).await;
    let client = ModrinthClient::new(ModrinthConfig::from(config)).context("failed to build API client")?;
    let icons = HttpIconLoader::new(&config.user_agent, config.timeout()).context("failed to build icon loader")?;
    let pacing = Pacing { after_cache_hit: config.hit_pause(), after_network: config.fetch_pause() };

    let mut fetcher = MetadataFetcher::new(client, icons, cache).with_pacing(pacing);
    let mut renderer = TerminalRenderer::new(std::io::stdout());

    let resolutions = fetcher.resolve_all(&targets, &mut renderer).await;

    let count = |kind: Resolution| resolutions.iter().filter(|r| **r == kind).count();
    tracing::info!(
        targets = targets.len(),
        cache_hits = count(Resolution::CacheHit),
        fetched = count(Resolution::Fetched),
        stale = count(Resolution::StaleFallback),
        failed = count(Resolution::Failed),
        unresolved = count(Resolution::Unresolved),
        "resolve finished"
    );

    Ok(())
}
