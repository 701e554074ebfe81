//! Persisted cache of remote project metadata.
//!
//! The whole cache is one JSON object keyed by slug, stored under
//! [`CACHE_KEY`]. It is read once when [`MetadataCache::load`] runs and
//! written back in full after every successful update. Entries older than
//! the TTL are never evicted; they stay around as a fallback for when the
//! remote source is unreachable.

use crate::Error;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Storage key of the serialized cache blob.
pub const CACHE_KEY: &str = "amble_mods_cache_v1";

/// Default time-to-live for cache entries (12 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Sentinel rendered for any unknown value.
pub const UNKNOWN: &str = "—";

fn unknown_label() -> String {
    UNKNOWN.to_string()
}

/// Metadata for one slug as of its last successful retrieval.
///
/// Field names on the wire are `version`, `downloads`, `icon` and `ts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "version", default = "unknown_label")]
    pub version_label: String,
    #[serde(rename = "downloads", default)]
    pub download_count: Option<u64>,
    #[serde(rename = "icon", default)]
    pub icon_reference: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "ts")]
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(
        slug: impl Into<String>, version_label: impl Into<String>, download_count: Option<u64>,
        icon_reference: Option<String>, fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug: slug.into(),
            version_label: version_label.into(),
            download_count,
            icon_reference,
            timestamp: fetched_at.timestamp_millis(),
        }
    }

    /// When this entry was fetched, if the stored timestamp is in range.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Age of the entry in milliseconds (negative if the clock went backwards).
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis().saturating_sub(self.timestamp)
    }

    /// Fresh iff `now - timestamp < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.age_ms(now) < ttl_ms
    }
}

/// Slug-keyed metadata cache over a [`KeyValueStore`].
#[derive(Debug)]
pub struct MetadataCache<S> {
    store: S,
    entries: BTreeMap<String, CacheEntry>,
    ttl: Duration,
}

impl<S: KeyValueStore> MetadataCache<S> {
    /// Read the persisted blob from `store`.
    ///
    /// A missing, unreadable or unparsable blob yields an empty cache.
    /// Entries that fail to parse are dropped one by one.
    pub async fn load(store: S, ttl: Duration) -> Self {
        let entries = match store.get(CACHE_KEY).await {
            Ok(Some(raw)) => parse_blob(&raw),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read metadata cache, starting empty");
                BTreeMap::new()
            }
        };

        Self { store, entries, ttl }
    }

    /// Any entry for `slug`, fresh or stale.
    pub fn get(&self, slug: &str) -> Option<&CacheEntry> {
        self.entries.get(slug)
    }

    /// The entry for `slug` only if it is still fresh at `now`.
    pub fn fresh(&self, slug: &str, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries.get(slug).filter(|entry| entry.is_fresh(now, self.ttl))
    }

    /// Insert or replace an entry, then persist the whole cache.
    ///
    /// The in-memory entry is kept even if persisting fails.
    pub async fn insert(&mut self, entry: CacheEntry) -> Result<(), Error> {
        self.entries.insert(entry.slug.clone(), entry);
        self.persist().await
    }

    /// Write the full cache blob to the store.
    pub async fn persist(&self) -> Result<(), Error> {
        let blob = serde_json::to_string(&self.entries)?;
        self.store.set(CACHE_KEY, &blob).await
    }

    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

}

fn parse_blob(raw: &str) -> BTreeMap<String, CacheEntry> {
    let values = match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(error = %e, "discarding unparsable metadata cache");
            return BTreeMap::new();
        }
    };

    let total = values.len();
    let entries: BTreeMap<String, CacheEntry> = values
        .into_iter()
        .filter_map(|(slug, value)| match serde_json::from_value::<CacheEntry>(value) {
            Ok(mut entry) => {
                entry.slug.clone_from(&slug);
                Some((slug, entry))
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "dropping unparsable metadata cache entry");
                None
            }
        })
        .collect();

    tracing::debug!(entries = entries.len(), dropped = total - entries.len(), "loaded metadata cache");
    entries
}
