//! Core types and shared functionality for amble.
//!
//! This crate provides:
//! - Key-value store with SQLite and in-memory backends
//! - Persisted metadata cache with TTL freshness
//! - Stored preferences and the settings panel sequence
//! - Tilt effect math and member cards
//! - Unified error types and layered configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod members;
pub mod metadata;
pub mod panel;
pub mod settings;
pub mod store;
pub mod tilt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use metadata::{CacheEntry, MetadataCache, UNKNOWN};
pub use settings::{Preference, Settings};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
