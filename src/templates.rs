//! Message template store.
//!
//! Templates are keyed by segment and relationship strength and persisted as
//! JSON at `~/.outreach/templates.json`. The struct shape guarantees the
//! invariant that both segments and all three strengths are always present:
//! a file missing any combination fails to parse and falls back to the
//! built-in defaults (logged, never fatal).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{Segment, Strength};
use crate::error::OutreachError;
use crate::util::atomic_write_str;

/// Templates for one segment, one per strength tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTemplates {
    #[serde(rename = "Strong")]
    pub strong: String,
    #[serde(rename = "Moderate")]
    pub moderate: String,
    #[serde(rename = "Weak")]
    pub weak: String,
}

impl SegmentTemplates {
    fn get(&self, strength: Strength) -> &str {
        match strength {
            Strength::Strong => &self.strong,
            Strength::Moderate => &self.moderate,
            Strength::Weak => &self.weak,
        }
    }

    fn get_mut(&mut self, strength: Strength) -> &mut String {
        match strength {
            Strength::Strong => &mut self.strong,
            Strength::Moderate => &mut self.moderate,
            Strength::Weak => &mut self.weak,
        }
    }
}

/// The full two-level template mapping: segment → strength → template text.
///
/// Placeholders `{name}`, `{role}` and `{company}` are substituted at
/// message-generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    pub exec: SegmentTemplates,
    #[serde(rename = "non-exec")]
    pub non_exec: SegmentTemplates,
}

impl Default for TemplateSet {
    fn default() -> Self {
        TemplateSet {
            exec: SegmentTemplates {
                strong: "Hi {name}, we've been connected for a while, and I thought you might be interested in joining our B2B pilot program. Given your role as {role} at {company}, your insights would be invaluable.".to_string(),
                moderate: "Hi {name}. We're launching a B2B pilot program, and I thought you might be a great fit to provide feedback in your leadership role. Would love to hear your thoughts!".to_string(),
                weak: "Hi {name}, I noticed you're {role} at {company}. I wanted to share that our app beams is now on the appstore, and thought it might be a useful tool for you.".to_string(),
            },
            non_exec: SegmentTemplates {
                strong: "Hi {name}, as someone who's been in my network for a while, I wanted to personally invite you to check out our new app. I think it could be a great fit for someone in your role at {company}.".to_string(),
                moderate: "Hi {name}, how is it going? We're excited to share our new app, which I think could be very relevant for your work at {company}. Would love for you to check it out!".to_string(),
                weak: "Hi {name}, I noticed you're {role} at {company}. I wanted to share that our app beams is now on the appstore, and thought it might be a useful tool for you.".to_string(),
            },
        }
    }
}

impl TemplateSet {
    /// Look up the template for a segment/strength combination.
    ///
    /// Completeness holds by construction, so this is always `Some` today;
    /// the generator still checks the seam and surfaces absence as
    /// `TemplateNotFound`.
    pub fn try_get(&self, segment: Segment, strength: Strength) -> Option<&str> {
        let group = match segment {
            Segment::Exec => &self.exec,
            Segment::NonExec => &self.non_exec,
        };
        Some(group.get(strength))
    }

    /// Replace the template for one combination (settings workflow).
    pub fn set(&mut self, segment: Segment, strength: Strength, text: String) {
        let group = match segment {
            Segment::Exec => &mut self.exec,
            Segment::NonExec => &mut self.non_exec,
        };
        *group.get_mut(strength) = text;
    }

    /// Load templates from disk, falling back to the built-in defaults when
    /// the file is missing or unparsable. In both fallback cases the default
    /// set is written back so the file exists for the next session.
    pub fn load_or_default(path: &Path) -> TemplateSet {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<TemplateSet>(&content) {
                Ok(set) => set,
                Err(e) => {
                    log::warn!(
                        "Unparsable templates file {}: {}. Reverting to defaults.",
                        path.display(),
                        e
                    );
                    let defaults = TemplateSet::default();
                    if let Err(e) = defaults.save(path) {
                        log::warn!("Failed to write default templates: {e}");
                    }
                    defaults
                }
            },
            Err(_) => {
                let defaults = TemplateSet::default();
                if let Err(e) = defaults.save(path) {
                    log::warn!("Failed to write default templates: {e}");
                }
                defaults
            }
        }
    }

    /// Persist the set (atomic write).
    pub fn save(&self, path: &Path) -> Result<(), OutreachError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| OutreachError::Persistence(format!("Failed to serialize templates: {e}")))?;
        atomic_write_str(path, &content)
            .map_err(|e| OutreachError::Persistence(format!("Failed to write templates: {e}")))
    }

    /// Overwrite storage with the built-in defaults and return them.
    pub fn reset(path: &Path) -> Result<TemplateSet, OutreachError> {
        let defaults = TemplateSet::default();
        defaults.save(path)?;
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_round_trips_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        let mut set = TemplateSet::default();
        set.set(Segment::Exec, Strength::Weak, "Hello {name}!".to_string());
        set.save(&path).unwrap();

        let reloaded = TemplateSet::load_or_default(&path);
        assert_eq!(reloaded, set);
        assert_eq!(
            reloaded.try_get(Segment::Exec, Strength::Weak),
            Some("Hello {name}!")
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults_and_persists_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        let set = TemplateSet::load_or_default(&path);
        assert_eq!(set, TemplateSet::default());
        assert!(path.exists());
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let set = TemplateSet::load_or_default(&path);
        assert_eq!(set, TemplateSet::default());
        // The bad file was replaced with a parsable default set
        let reloaded = TemplateSet::load_or_default(&path);
        assert_eq!(reloaded, TemplateSet::default());
    }

    #[test]
    fn test_incomplete_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        // Missing the entire non-exec segment: must not half-load
        std::fs::write(&path, r#"{"exec": {"Strong": "a", "Moderate": "b", "Weak": "c"}}"#)
            .unwrap();

        let set = TemplateSet::load_or_default(&path);
        assert_eq!(set, TemplateSet::default());
    }

    #[test]
    fn test_on_disk_keys_match_the_original_format() {
        let json = serde_json::to_string(&TemplateSet::default()).unwrap();
        assert!(json.contains("\"exec\""));
        assert!(json.contains("\"non-exec\""));
        assert!(json.contains("\"Strong\""));
        assert!(json.contains("\"Moderate\""));
        assert!(json.contains("\"Weak\""));
    }
}
