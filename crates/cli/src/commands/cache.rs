//! Cache command - list cached project metadata.

use super::open_store;
use amble_client::meta::format_count;
use amble_core::{AppConfig, CacheEntry, MetadataCache};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Execute the cache command
pub async fn execute(config: &AppConfig) -> Result<()> {
    let store = open_store(config).await?;
    let cache = MetadataCache::load(store, config.cache_ttl()).await;

    if cache.is_empty() {
        println!("No cached project metadata.");
        return Ok(());
    }

    println!("{:<28} {:<16} {:>14} {:>10} {:<6}", "SLUG", "VERSION", "DOWNLOADS", "AGE", "STATE");
    println!("{}", "-".repeat(78));

    let now = Utc::now();
    for entry in cache.entries() {
        println!("{}", table_row(entry, now, cache.ttl()));
    }

    Ok(())
}

fn table_row(entry: &CacheEntry, now: DateTime<Utc>, ttl: Duration) -> String {
    let state = if entry.is_fresh(now, ttl) { "fresh" } else { "stale" };
    format!(
        "{:<28} {:<16} {:>14} {:>10} {:<6}",
        entry.slug,
        entry.version_label,
        format_count(entry.download_count),
        format_age(entry.age_ms(now)),
        state
    )
}

/// Compact age such as `45s`, `12m`, `3h` or `2d`.
fn format_age(age_ms: i64) -> String {
    let secs = age_ms.max(0) / 1000;
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}
