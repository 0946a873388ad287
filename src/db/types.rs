//! Shared type definitions for the database layer.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// A row from the `contacts` table: one profile already handled (message
/// sent, or explicitly skipped).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbContact {
    pub linkedin_url: String,
    pub last_contacted: Option<String>,
    pub message_used: Option<String>,
    pub sent: bool,
}

/// Map the model's boolean to the TEXT column the original tool used.
pub(crate) fn sent_to_column(sent: bool) -> &'static str {
    if sent {
        "Yes"
    } else {
        "No"
    }
}

/// Read the TEXT column back into a boolean.
///
/// The original tool wrote Python booleans straight into this column, so
/// legacy databases may hold "True"/"False" alongside "Yes"/"No". Accept
/// both spellings.
pub(crate) fn sent_from_column(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_column_round_trip() {
        assert!(sent_from_column(sent_to_column(true)));
        assert!(!sent_from_column(sent_to_column(false)));
    }

    #[test]
    fn test_sent_accepts_legacy_python_booleans() {
        assert!(sent_from_column("True"));
        assert!(!sent_from_column("False"));
        assert!(!sent_from_column(""));
    }
}
