//! Error types for the outreach pipeline
//!
//! Errors are classified by recoverability:
//! - Retryable: LinkedIn fetch failures (network, auth challenge)
//! - NonRetryable: malformed input data, template misconfiguration
//! - Fatal to the calling operation: persistence failures (the triggering
//!   action is reported as failed and in-memory state is left untouched)

use thiserror::Error;

use crate::classify::{Segment, Strength};

/// Error types for the outreach pipeline.
#[derive(Debug, Error)]
pub enum OutreachError {
    /// Malformed input data: an unparsable connection date or CSV structure.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No template exists for this segment/strength combination.
    #[error("No template for segment '{segment}' at strength '{strength}'")]
    TemplateNotFound { segment: Segment, strength: Strength },

    /// A template placeholder has no corresponding value.
    #[error("Template placeholder has no value: {0}")]
    MissingField(String),

    /// Disk or database failure. Fatal to the calling operation.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The external LinkedIn fetch failed. Non-fatal, retryable.
    #[error("LinkedIn fetch failed: {0}")]
    AuthFetch(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl OutreachError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OutreachError::AuthFetch(_))
    }

    /// Get a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OutreachError::Parse(_) => {
                "Check the export file format. Connection dates must look like '07 Feb 2023'."
            }
            OutreachError::TemplateNotFound { .. } | OutreachError::MissingField(_) => {
                "Check your templates in ~/.outreach/templates.json, or reset them to defaults."
            }
            OutreachError::Persistence(_) => "Check disk space and file permissions for ~/.outreach.",
            OutreachError::AuthFetch(_) => {
                "Check your LinkedIn credentials and internet connection, then try again."
            }
            OutreachError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for OutreachError {
    fn from(err: std::io::Error) -> Self {
        OutreachError::Io(err.to_string())
    }
}

impl From<crate::db::DbError> for OutreachError {
    fn from(err: crate::db::DbError) -> Self {
        OutreachError::Persistence(err.to_string())
    }
}
