//! Durable key-value persistence over SQLite.
//!
//! The whole application persists its state as JSON text documents under
//! named keys (`activities`, `custom_types`, `settings`, `theme`). This
//! module provides that contract: `get` returns the stored text or `None`,
//! `set` overwrites it atomically. The stores sitting on top never see SQL.

use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::PathBuf;
use thiserror::Error;

/// Durable key-value store backed by SQLite.
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    /// Open or create a store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self, KvError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KvError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| KvError::ConnectionFailed(e.to_string()))?;

        let store = Self { conn };
        store.initialize()?;

        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, KvError> {
        let conn =
            Connection::open_in_memory().map_err(|e| KvError::ConnectionFailed(e.to_string()))?;

        let store = Self { conn };
        store.initialize()?;

        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), KvError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| KvError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, KvError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(KvError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), KvError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| KvError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| KvError::MigrationFailed(e.to_string()))?;

            tracing::info!("Key-value store migrated to version {}", CURRENT_VERSION);
        }

        // Future migrations would go here:
        // if from_version < 2 { ... }

        Ok(())
    }

    /// Read the document stored under `key`, `None` when absent.
    pub fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let result: SqliteResult<String> = self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(KvError::QueryFailed(e.to_string())),
        }
    }

    /// Write `value` under `key`, replacing any previous document.
    pub fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )
            .map_err(|e| KvError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Remove the document stored under `key`, a no-op when absent.
    pub fn remove(&self, key: &str) -> Result<(), KvError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| KvError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

/// Persistence errors.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
