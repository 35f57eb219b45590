//! SQLite implementation of the key-value and sorted-index backends.
//!
//! Opening applies the pragmas needed for concurrent access (WAL mode) and
//! runs migrations. Expiry is enforced here: a row past its `expires_at` is
//! invisible to every read and is removed when a read trips over it.

use super::backend::{KeyTtl, KeyValueBackend, SortedIndexBackend};
use super::migrations;
use crate::Error;
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tokio_rusqlite::{Connection, params, rusqlite};

/// SQLite-backed storage handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning shares the same connection.
#[derive(Clone, Debug)]
pub struct SqliteBackend {
    pub(crate) conn: Connection,
}

fn is_live(expires_at: Option<i64>, now: i64) -> bool {
    expires_at.is_none_or(|t| t > now)
}

/// Finite bound or None, so `f64::INFINITY` maps to an open-ended range.
fn bound(score: f64) -> Option<f64> {
    score.is_finite().then_some(score)
}

impl SqliteBackend {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations. Fails fast if the database cannot
    /// be opened; there is no fallback store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::configure(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::configure(conn).await
    }

    async fn configure(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Delete every expired key.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                    params![now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl KeyValueBackend for SqliteBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT value, expires_at FROM kv_entries WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<i64>>(1)?)),
                );

                match result {
                    Ok((value, expires_at)) if is_live(expires_at, now) => Ok(Some(value)),
                    Ok(_) => {
                        conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
                        Ok(None)
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let expires_at = ttl_seconds.map(|ttl| Utc::now().timestamp() + ttl as i64);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        expires_at = excluded.expires_at",
                    params![key, value, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, key: &str) -> Result<u64, Error> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.transaction()?;
                let removed = tx.execute(
                    "DELETE FROM kv_entries WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                    params![key, now],
                )?;
                // An expired row is already gone as far as callers can tell.
                tx.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
                tx.commit()?;
                Ok(removed as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool, Error> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        let expires_at = now + ttl_seconds as i64;
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let changed = conn.execute(
                    "UPDATE kv_entries SET expires_at = ?2
                    WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?3)",
                    params![key, expires_at, now],
                )?;
                Ok(changed > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, Error> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<KeyTtl, Error> {
                let result = conn.query_row(
                    "SELECT expires_at FROM kv_entries WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, Option<i64>>(0),
                );

                match result {
                    Ok(None) => Ok(KeyTtl::Persistent),
                    Ok(Some(t)) if t > now => Ok(KeyTtl::Expires((t - now) as u64)),
                    Ok(Some(_)) => Ok(KeyTtl::Missing),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(KeyTtl::Missing),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl SortedIndexBackend for SqliteBackend {
    async fn add_scored(&self, index: &str, entries: &[(&str, f64)]) -> Result<(), Error> {
        let index = index.to_string();
        let entries: Vec<(String, f64)> = entries.iter().map(|(m, s)| ((*m).to_string(), *s)).collect();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO sorted_index (index_key, member, score) VALUES (?1, ?2, ?3)
                        ON CONFLICT(index_key, member) DO UPDATE SET score = excluded.score",
                    )?;
                    for (member, score) in &entries {
                        stmt.execute(params![index, member, score])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn range_by_score(&self, index: &str, min: f64, max: f64) -> Result<Vec<String>, Error> {
        let index = index.to_string();
        let (min, max) = (bound(min), bound(max));
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT member FROM sorted_index
                    WHERE index_key = ?1
                      AND (?2 IS NULL OR score >= ?2)
                      AND (?3 IS NULL OR score <= ?3)
                    ORDER BY score ASC, member ASC",
                )?;
                let members = stmt
                    .query_map(params![index, min, max], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(members)
            })
            .await
            .map_err(Error::from)
    }

    async fn remove_members(&self, index: &str, members: &[&str]) -> Result<u64, Error> {
        let index = index.to_string();
        let members: Vec<String> = members.iter().map(|m| (*m).to_string()).collect();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.transaction()?;
                let mut removed = 0u64;
                {
                    let mut stmt = tx.prepare("DELETE FROM sorted_index WHERE index_key = ?1 AND member = ?2")?;
                    for member in &members {
                        removed += stmt.execute(params![index, member])? as u64;
                    }
                }
                tx.commit()?;
                Ok(removed)
            })
            .await
            .map_err(Error::from)
    }
}
