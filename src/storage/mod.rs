pub mod kv;
pub mod migrations;

use crate::shared::errors::StorageError;
use crate::shared::paths::ensure_dir;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Database wrapper with thread-safe connection
pub struct Database(pub Mutex<Connection>);

impl Database {
    /// Open (or create) the database file and run migrations.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            ensure_dir(parent).map_err(|e| StorageError::directory(e.to_string()))?;
        }

        let conn = Connection::open(db_path)?;
        migrations::run_migrations(&conn)?;

        tracing::info!(target: "server", "Database initialized at {:?}", db_path);

        Ok(Self(Mutex::new(conn)))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self(Mutex::new(conn)))
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.0.lock().map_err(|_| StorageError::LockPoisoned)
    }
}
