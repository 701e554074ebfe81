//! Store schema versioning.
//!
//! The schema version lives in SQLite's `PRAGMA user_version`. Step `n` in
//! [`STEPS`] upgrades version `n` to `n + 1` and runs in its own
//! transaction together with the version bump.

use crate::Error;
use tokio_rusqlite::Connection;

/// Upgrade steps, oldest first.
const STEPS: &[&str] = &[include_str!("../../migrations/001_kv_store.sql")];

/// Version a fully upgraded store reports.
pub const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Bring the schema up to [`SCHEMA_VERSION`].
///
/// A store written by a newer build is refused rather than touched.
pub async fn upgrade(conn: &Connection) -> Result<i64, Error> {
    conn.call(|conn| -> Result<i64, Error> {
        let current: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if current > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "store schema v{current} is newer than supported v{SCHEMA_VERSION}"
            )));
        }

        for (from, sql) in (current..).zip(STEPS.iter().skip(current as usize)) {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("v{from} -> v{}: {e}", from + 1)))?;
            tx.pragma_update(None, "user_version", from + 1)?;
            tx.commit()?;
            tracing::debug!(version = from + 1, "store schema upgraded");
        }

        Ok(SCHEMA_VERSION)
    })
    .await
    .map_err(Error::from)
}
