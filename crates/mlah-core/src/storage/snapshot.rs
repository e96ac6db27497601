//! Durable store snapshots
//!
//! Each domain store persists its full state as one JSON blob, keyed by the
//! store's name. Blobs are independent: a store is read once at startup and
//! overwritten after every successful mutation, and no write ever spans two
//! stores.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

use crate::error::Result;

/// Snapshot key for the session store
pub const SESSION_SNAPSHOT: &str = "session-storage";

/// Snapshot key for the tourist domain store
pub const TOURIST_SNAPSHOT: &str = "tourist-storage";

/// Snapshot key for the labour domain store
pub const LABOUR_SNAPSHOT: &str = "labour-storage";

/// Key-value access to the snapshot table
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    pool: SqlitePool,
}

impl SnapshotStore {
    /// Create a snapshot store over an initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load a store's snapshot, if one was ever written
    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT payload FROM snapshots WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((payload,)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Overwrite a store's snapshot with its current full state
    pub async fn save<T: Serialize>(&self, name: &str, state: &T) -> Result<()> {
        let payload = serde_json::to_string(state)?;

        sqlx::query(
            "INSERT INTO snapshots (name, payload, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        )
        .bind(name)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a store's snapshot. Returns whether a row was deleted.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM snapshots WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
