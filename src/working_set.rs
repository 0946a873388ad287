//! The in-memory working set: per-segment lists of contacts pending review.
//!
//! Rows enter via the import pipeline and leave when the user marks them
//! sent or skipped, or when the recently-contacted filter removes them. The
//! GUI-free model the presentation layer binds to (two ordered collections
//! of value objects).

use serde::Serialize;

use crate::classify::{Segment, Strength};
use crate::error::OutreachError;
use crate::message;
use crate::templates::TemplateSet;

/// One imported connection with its derived triage fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    /// Position/title from the export; may be absent.
    pub position: Option<String>,
    pub company: String,
    /// Source-format connection date, e.g. "07 Feb 2023".
    pub connected_on: String,
    /// Profile URL, the unique identifier.
    pub url: String,
    pub segment: Segment,
    pub strength: Strength,
    pub message: String,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The two review groups, ordered as imported.
#[derive(Debug, Default)]
pub struct WorkingSet {
    exec: Vec<Contact>,
    non_exec: Vec<Contact>,
}

impl WorkingSet {
    /// Append a contact to the group its segment selects.
    pub fn push(&mut self, contact: Contact) {
        match contact.segment {
            Segment::Exec => self.exec.push(contact),
            Segment::NonExec => self.non_exec.push(contact),
        }
    }

    pub fn group(&self, segment: Segment) -> &[Contact] {
        match segment {
            Segment::Exec => &self.exec,
            Segment::NonExec => &self.non_exec,
        }
    }

    fn group_mut(&mut self, segment: Segment) -> &mut Vec<Contact> {
        match segment {
            Segment::Exec => &mut self.exec,
            Segment::NonExec => &mut self.non_exec,
        }
    }

    pub fn len(&self) -> usize {
        self.exec.len() + self.non_exec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a contact by profile URL in either group.
    pub fn find(&self, url: &str) -> Option<&Contact> {
        self.exec
            .iter()
            .chain(self.non_exec.iter())
            .find(|c| c.url == url)
    }

    /// Move a row to the other segment. The row keeps its current message;
    /// only a strength change regenerates it. Returns false if the URL is
    /// not in the working set.
    pub fn move_to_other_segment(&mut self, url: &str) -> bool {
        for segment in [Segment::Exec, Segment::NonExec] {
            let group = self.group_mut(segment);
            if let Some(pos) = group.iter().position(|c| c.url == url) {
                let mut contact = group.remove(pos);
                contact.segment = segment.other();
                self.group_mut(segment.other()).push(contact);
                return true;
            }
        }
        false
    }

    /// Re-score a row and regenerate its message from the matching template.
    pub fn set_strength(
        &mut self,
        url: &str,
        strength: Strength,
        templates: &TemplateSet,
    ) -> Result<bool, OutreachError> {
        for group in [&mut self.exec, &mut self.non_exec] {
            if let Some(contact) = group.iter_mut().find(|c| c.url == url) {
                let new_message = message::generate(
                    templates,
                    &contact.first_name,
                    contact.position.as_deref().unwrap_or(""),
                    &contact.company,
                    strength,
                    contact.segment,
                )?;
                contact.strength = strength;
                contact.message = new_message;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Remove a row by URL (after it was marked sent or skipped).
    pub fn remove(&mut self, url: &str) -> Option<Contact> {
        for group in [&mut self.exec, &mut self.non_exec] {
            if let Some(pos) = group.iter().position(|c| c.url == url) {
                return Some(group.remove(pos));
            }
        }
        None
    }

    /// Remove every row the predicate matches, from both groups. Returns the
    /// number removed.
    pub fn remove_matching<F: Fn(&Contact) -> bool>(&mut self, pred: F) -> usize {
        let before = self.len();
        self.exec.retain(|c| !pred(c));
        self.non_exec.retain(|c| !pred(c));
        before - self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn contact(url: &str, segment: Segment) -> Contact {
        Contact {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            position: Some("CTO".to_string()),
            company: "Acme".to_string(),
            connected_on: "07 Feb 2020".to_string(),
            url: url.to_string(),
            segment,
            strength: Strength::Strong,
            message: "hello".to_string(),
        }
    }

    #[test]
    fn test_push_routes_by_segment() {
        let mut ws = WorkingSet::default();
        ws.push(contact("u1", Segment::Exec));
        ws.push(contact("u2", Segment::NonExec));
        assert_eq!(ws.group(Segment::Exec).len(), 1);
        assert_eq!(ws.group(Segment::NonExec).len(), 1);
    }

    #[test]
    fn test_move_to_other_segment_flips_and_appends() {
        let mut ws = WorkingSet::default();
        ws.push(contact("u1", Segment::Exec));
        assert!(ws.move_to_other_segment("u1"));
        assert!(ws.group(Segment::Exec).is_empty());
        let moved = &ws.group(Segment::NonExec)[0];
        assert_eq!(moved.segment, Segment::NonExec);
        assert!(!ws.move_to_other_segment("missing"));
    }

    #[test]
    fn test_set_strength_regenerates_message() {
        let templates = TemplateSet::default();
        let mut ws = WorkingSet::default();
        ws.push(contact("u1", Segment::Exec));

        assert!(ws.set_strength("u1", Strength::Weak, &templates).unwrap());
        let c = ws.find("u1").unwrap();
        assert_eq!(c.strength, Strength::Weak);
        assert_eq!(
            c.message,
            "Hi Jane, I noticed you're CTO at Acme. I wanted to share that our app beams is now on the appstore, and thought it might be a useful tool for you."
        );
    }

    #[test]
    fn test_remove_takes_the_row_out() {
        let mut ws = WorkingSet::default();
        ws.push(contact("u1", Segment::Exec));
        assert!(ws.remove("u1").is_some());
        assert!(ws.is_empty());
        assert!(ws.remove("u1").is_none());
    }
}
