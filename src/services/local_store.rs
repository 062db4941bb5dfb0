//! SQLite persistence for client-side reading state.
//!
//! One JSON snapshot of the reading preferences per identity, so choices
//! survive restarts even when nothing reaches the backend.

use crate::error::Result;
use crate::types::ReadingPreferences;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// SQLite store for client-side state snapshots.
pub struct LocalStateStore {
    conn: Mutex<Connection>,
}

impl LocalStateStore {
    /// Open (or create) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("Local state store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory local state store initialized");
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute(
            "CREATE TABLE IF NOT EXISTS reading_state (
                identity TEXT PRIMARY KEY,
                state_json TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Load the snapshot saved for an identity.
    ///
    /// A snapshot that no longer parses is treated as missing.
    pub fn load(&self, identity: &str) -> Result<Option<ReadingPreferences>> {
        let json: Option<String> = self
            .conn()
            .query_row(
                "SELECT state_json FROM reading_state WHERE identity = ?1",
                params![identity],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(prefs) => Ok(Some(prefs)),
            Err(e) => {
                warn!("Discarding unreadable local state for {}: {}", identity, e);
                Ok(None)
            }
        }
    }

    /// Save a snapshot for an identity, replacing the previous one.
    pub fn save(&self, identity: &str, prefs: &ReadingPreferences) -> Result<()> {
        let json = serde_json::to_string(prefs)?;
        self.conn().execute(
            "INSERT INTO reading_state (identity, state_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(identity) DO UPDATE SET
                state_json = excluded.state_json,
                updated_at = excluded.updated_at",
            params![identity, json, chrono::Utc::now().timestamp_millis()],
        )?;
        debug!("Saved local state for {}", identity);
        Ok(())
    }
}
