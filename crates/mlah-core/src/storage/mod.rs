//! Storage layer - SQLite-backed store snapshots
//!
//! Provides the database pool and the snapshot table each domain store
//! persists itself into.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and schema initialization
//! - `snapshot`: One durable JSON blob per domain store, written through on
//!   every successful mutation and read once at startup
//!
//! # Usage
//!
//! ```ignore
//! use mlah_core::storage::{Database, SnapshotStore};
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//! let snapshots = SnapshotStore::new(db.pool().clone());
//! ```

pub mod database;
pub mod snapshot;

// Re-export commonly used types
pub use database::{Database, DatabaseConfig};
pub use snapshot::{LABOUR_SNAPSHOT, SESSION_SNAPSHOT, SnapshotStore, TOURIST_SNAPSHOT};
