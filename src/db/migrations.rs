//! Schema migration framework.
//!
//! Numbered SQL migrations are embedded at compile time via `include_str!`
//! and run exactly once each, tracked by the `schema_version` table. When
//! migrations are pending against an existing database file, a hot copy is
//! taken first via SQLite's online backup API.

use std::path::Path;
use std::time::Duration;

use rusqlite::backup::Backup;
use rusqlite::Connection;

struct Migration {
    version: i32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migrations/001_baseline.sql"),
}];

/// Create the `schema_version` table if it doesn't exist.
fn ensure_schema_version_table(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| format!("Failed to create schema_version table: {}", e))
}

/// Return the highest applied migration version, or 0 if none.
fn current_version(conn: &Connection) -> Result<i32, String> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| format!("Failed to read schema version: {}", e))
}

/// Detect a database created by the original tool (it has the `contacts`
/// table but no `schema_version`) and mark the baseline as applied so its
/// CREATE TABLE never runs against an already-populated database.
fn bootstrap_existing_db(conn: &Connection) -> Result<bool, String> {
    let version = current_version(conn)?;
    if version > 0 {
        return Ok(false);
    }

    let has_contacts: bool = conn
        .prepare("SELECT 1 FROM contacts LIMIT 1")
        .and_then(|mut stmt| stmt.exists([]))
        .unwrap_or(false);

    if has_contacts {
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            [1],
        )
        .map_err(|e| format!("Failed to bootstrap schema version: {}", e))?;
        log::info!("Migration bootstrap: marked v1 (baseline) as applied for existing database");
        return Ok(true);
    }

    Ok(false)
}

/// Back up the database before applying migrations.
///
/// Uses SQLite's online backup API to create a hot copy at
/// `<db_path>.pre-migration.bak`. Only called when there are pending
/// migrations against an existing file.
fn backup_before_migration(conn: &Connection, db_path: &Path) -> Result<(), String> {
    let backup_path = db_path.with_extension("db.pre-migration.bak");
    let mut dst = Connection::open(&backup_path)
        .map_err(|e| format!("Failed to open backup target: {}", e))?;
    let backup = Backup::new(conn, &mut dst).map_err(|e| format!("Backup init failed: {}", e))?;
    backup
        .run_to_completion(64, Duration::from_millis(50), None)
        .map_err(|e| format!("Backup failed: {}", e))?;
    log::info!("Pre-migration backup written to {}", backup_path.display());
    Ok(())
}

/// Apply all pending migrations.
pub fn run_migrations(conn: &Connection, db_path: &Path) -> Result<(), String> {
    ensure_schema_version_table(conn)?;
    bootstrap_existing_db(conn)?;

    let applied = current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
    if pending.is_empty() {
        return Ok(());
    }

    // Backup only matters when an existing database is about to change shape
    if applied > 0 && db_path.exists() {
        backup_before_migration(conn, db_path)?;
    }

    for migration in pending {
        conn.execute_batch(migration.sql)
            .map_err(|e| format!("Migration {} failed: {}", migration.version, e))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [migration.version],
        )
        .map_err(|e| format!("Failed to record migration {}: {}", migration.version, e))?;
        log::info!("Applied schema migration v{}", migration.version);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();

        run_migrations(&conn, &path).unwrap();
        run_migrations(&conn, &path).unwrap();

        assert_eq!(current_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_bootstrap_marks_legacy_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        let conn = Connection::open(&path).unwrap();

        // A database created by the original tool: contacts table, no versioning
        conn.execute_batch(
            "CREATE TABLE contacts (
                linkedin_url TEXT PRIMARY KEY,
                last_contacted DATE,
                message_used TEXT,
                sent TEXT DEFAULT 'No'
            );
            INSERT INTO contacts (linkedin_url, last_contacted, message_used, sent)
            VALUES ('u1', '2024-01-01', 'hello', 'Yes');",
        )
        .unwrap();

        run_migrations(&conn, &path).unwrap();

        assert_eq!(current_version(&conn).unwrap(), 1);
        // The legacy row survived
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
