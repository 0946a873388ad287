//! Data-directory resolution and atomic file writes.
//!
//! All persisted state lives under `~/.outreach`: the contact database, the
//! credentials config, the message templates, and the recently-contacted
//! cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::OutreachError;

/// Resolve the per-user data directory: `~/.outreach`.
pub fn data_dir() -> Result<PathBuf, OutreachError> {
    let home = dirs::home_dir()
        .ok_or_else(|| OutreachError::Persistence("Home directory not found".to_string()))?;
    Ok(home.join(".outreach"))
}

/// Resolve the data directory, creating it if needed.
pub fn ensure_data_dir() -> Result<PathBuf, OutreachError> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir)
        .map_err(|e| OutreachError::Persistence(format!("Failed to create {}: {}", dir.display(), e)))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf, OutreachError> {
    Ok(data_dir()?.join("config.json"))
}

pub fn templates_path() -> Result<PathBuf, OutreachError> {
    Ok(data_dir()?.join("templates.json"))
}

pub fn recently_contacted_path() -> Result<PathBuf, OutreachError> {
    Ok(data_dir()?.join("recently_contacted.json"))
}

/// Write a file atomically: write to a sibling temp file, then rename over
/// the destination. A crash mid-write never leaves a truncated file behind.
pub fn atomic_write_str(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        atomic_write_str(&path, "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        atomic_write_str(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        // No temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }
}
