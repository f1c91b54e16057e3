//! SQLite-backed storage.
//!
//! Provides:
//! - A key-value table holding whole serialized records (the current trip,
//!   the timer session)
//! - Tables for the crew pass ledger

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use crate::error::StorageError;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/shoresafe.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("shoresafe.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS passes (
                id             TEXT PRIMARY KEY,
                type           TEXT NOT NULL,
                created_at     TEXT NOT NULL,
                expires_at     TEXT NOT NULL,
                host_device_id TEXT NOT NULL,
                share_code     TEXT NOT NULL UNIQUE,
                purchase_info  TEXT
            );

            CREATE TABLE IF NOT EXISTS guest_joins (
                id              TEXT PRIMARY KEY,
                pass_id         TEXT NOT NULL REFERENCES passes(id),
                guest_device_id TEXT NOT NULL,
                joined_at       TEXT NOT NULL,
                UNIQUE(pass_id, guest_device_id)
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Missing keys are not an error.
    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
