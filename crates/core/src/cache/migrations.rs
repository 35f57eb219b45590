//! Schema upgrades for the cache database.
//!
//! The applied schema version lives in SQLite's `user_version` header field.
//! Opening a database brings it up to [`SCHEMA_VERSION`] one step at a time.

use tokio_rusqlite::Connection;

use super::Error;

struct SchemaStep {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep { version: 1, name: "kv_entries", sql: include_str!("../../migrations/001_kv_entries.sql") },
    SchemaStep { version: 2, name: "sorted_index", sql: include_str!("../../migrations/002_sorted_index.sql") },
];

/// Schema version a fully upgraded database reports.
pub const SCHEMA_VERSION: i64 = 2;

/// Apply every step newer than the database's recorded version.
///
/// Each step commits together with its version bump, so an interrupted
/// upgrade resumes from the last completed step. A database written by a
/// newer build is rejected.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if found > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "database schema v{found} is newer than supported v{SCHEMA_VERSION}"
            )));
        }

        for step in STEPS.iter().filter(|step| step.version > found) {
            let tx = conn.transaction()?;
            tx.execute_batch(step.sql)
                .map_err(|e| Error::MigrationFailed(format!("v{} {}: {e}", step.version, step.name)))?;
            tx.pragma_update(None, "user_version", step.version)?;
            tx.commit()?;
            tracing::debug!(version = step.version, name = step.name, "upgraded cache schema");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
