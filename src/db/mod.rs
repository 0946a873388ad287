//! SQLite-backed contact ledger.
//!
//! The database lives at `~/.outreach/outreach.db` and records every profile
//! the user has already handled, keyed by LinkedIn URL. Writes are committed
//! immediately; a crash after `upsert` returns never loses the record. The
//! import pipeline reads the ledger to suppress rows already processed.

use std::path::PathBuf;

use rusqlite::Connection;

mod contacts;
mod migrations;
pub mod types;
pub use types::*;

pub struct ContactDb {
    conn: Connection,
}

impl ContactDb {
    /// Open (or create) the database at `~/.outreach/outreach.db` and apply
    /// the schema.
    pub fn open() -> Result<Self, DbError> {
        Self::open_at(Self::db_path()?)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL keeps reads cheap while a write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        migrations::run_migrations(&conn, &path).map_err(DbError::Migration)?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.outreach/outreach.db`.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".outreach").join("outreach.db"))
    }
}
