//! Recently-contacted names: cache file, working-set filter, and the fetch
//! collaborator seam.
//!
//! The filter matches on (first name, last name) only, split from a full
//! name on whitespace, compared case-insensitively after trimming. That is
//! a heuristic, not an identity match: two distinct people sharing a name
//! will both be removed. Accepted limitation, inherited from the source
//! data (LinkedIn's messaging page only exposes display names).

use std::path::Path;

use crate::config::Session;
use crate::error::OutreachError;
use crate::util::atomic_write_str;
use crate::working_set::WorkingSet;

/// Fetches the display names of recently-messaged connections. Implemented
/// by the LinkedIn scraper; tests substitute a stub.
pub trait RecentContactsFetcher {
    fn fetch(&self, session: &Session) -> Result<Vec<String>, OutreachError>;
}

/// Load the cached name list. A missing cache is `Ok(None)`; the caller
/// decides whether to refresh.
pub fn load_cache(path: &Path) -> Result<Option<Vec<String>>, OutreachError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| OutreachError::Persistence(format!("Failed to read {}: {}", path.display(), e)))?;
    let names = serde_json::from_str(&content)
        .map_err(|e| OutreachError::Parse(format!("Bad recently-contacted cache: {e}")))?;
    Ok(Some(names))
}

/// Overwrite the cache with a freshly fetched name list.
pub fn save_cache(path: &Path, names: &[String]) -> Result<(), OutreachError> {
    let content = serde_json::to_string(names)
        .map_err(|e| OutreachError::Persistence(format!("Failed to serialize cache: {e}")))?;
    atomic_write_str(path, &content)
        .map_err(|e| OutreachError::Persistence(format!("Failed to write cache: {e}")))
}

/// Split a full name into a lowercased (first, last) pair: first token and
/// last token. Names with fewer than two tokens cannot match and yield None.
fn split_full_name(full_name: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    Some((
        tokens[0].to_lowercase(),
        tokens[tokens.len() - 1].to_lowercase(),
    ))
}

/// Remove every working-set row whose (first, last) name matches one of the
/// externally supplied full names. Returns the number of rows removed.
pub fn filter_recent(working: &mut WorkingSet, names: &[String]) -> usize {
    let keys: Vec<(String, String)> = names.iter().filter_map(|n| split_full_name(n)).collect();
    if keys.is_empty() {
        return 0;
    }
    working.remove_matching(|contact| {
        let first = contact.first_name.trim().to_lowercase();
        let last = contact.last_name.trim().to_lowercase();
        keys.iter().any(|(f, l)| *f == first && *l == last)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Segment, Strength};
    use crate::working_set::Contact;

    fn contact(first: &str, last: &str, url: &str) -> Contact {
        Contact {
            first_name: first.to_string(),
            last_name: last.to_string(),
            position: None,
            company: "Acme".to_string(),
            connected_on: "01 Jan 2024".to_string(),
            url: url.to_string(),
            segment: Segment::NonExec,
            strength: Strength::Weak,
            message: String::new(),
        }
    }

    #[test]
    fn test_removes_matching_name_case_insensitively() {
        let mut ws = WorkingSet::default();
        ws.push(contact("jane", "doe", "u1"));
        ws.push(contact("jane", "smith", "u2"));

        let removed = filter_recent(&mut ws, &["Jane Doe".to_string()]);
        assert_eq!(removed, 1);
        assert!(ws.find("u1").is_none());
        assert!(ws.find("u2").is_some());
    }

    #[test]
    fn test_middle_names_match_on_first_and_last_token() {
        let mut ws = WorkingSet::default();
        ws.push(contact("Jane", "Doe", "u1"));

        let removed = filter_recent(&mut ws, &["  jane   van   DOE ".to_string()]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_single_token_names_are_skipped() {
        let mut ws = WorkingSet::default();
        ws.push(contact("Cher", "", "u1"));

        let removed = filter_recent(&mut ws, &["Cher".to_string()]);
        assert_eq!(removed, 0);
        assert!(ws.find("u1").is_some());
    }

    #[test]
    fn test_cache_round_trip_and_missing_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recently_contacted.json");

        assert!(load_cache(&path).unwrap().is_none());

        let names = vec!["Jane Doe".to_string(), "Ann Li".to_string()];
        save_cache(&path, &names).unwrap();
        assert_eq!(load_cache(&path).unwrap(), Some(names));
    }
}
