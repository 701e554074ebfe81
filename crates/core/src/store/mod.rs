//! Key-value storage for preferences and the metadata cache blob.
//!
//! Everything amble persists is a string value under a well-known key:
//! the serialized metadata cache and one `"true"`/`"false"` flag per
//! preference. Callers depend on the [`KeyValueStore`] trait so the backing
//! medium can be swapped:
//!
//! - [`SqliteStore`]: file-backed SQLite (WAL mode, versioned schema)
//! - [`MemoryStore`]: process-local map, used by tests and dry runs

pub mod connection;
pub mod memory;
pub mod schema;

use crate::Error;
use async_trait::async_trait;
use std::sync::Arc;

pub use connection::SqliteStore;
pub use memory::MemoryStore;

/// String key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value).await
    }
}

pub(crate) fn check_key(key: &str) -> Result<(), Error> {
    if key.trim().is_empty() {
        return Err(Error::InvalidInput("storage key cannot be empty".into()));
    }
    Ok(())
}
