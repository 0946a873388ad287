//! Credentials config and the per-session login context.
//!
//! Only the LinkedIn username is persisted (`~/.outreach/config.json`). The
//! password is prompted once per session and carried in an explicit
//! [`Session`] value handed to the fetch collaborator, never ambient state,
//! never written to disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OutreachError;
use crate::util::atomic_write_str;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub linkedin_username: String,
}

impl Config {
    /// Load the config, or defaults when the file is missing or unparsable.
    pub fn load(path: &Path) -> Config {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Unparsable config {}: {}. Using defaults.", path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), OutreachError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| OutreachError::Persistence(format!("Failed to serialize config: {e}")))?;
        atomic_write_str(path, &content)
            .map_err(|e| OutreachError::Persistence(format!("Failed to write config: {e}")))
    }
}

/// Session-scoped login context for the external fetch.
#[derive(Clone)]
pub struct Session {
    pub username: String,
    password: String,
}

impl Session {
    pub fn new(username: String, password: String) -> Self {
        Session { username, password }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of debug output and logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
