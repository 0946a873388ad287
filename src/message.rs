//! Message generation: template lookup + placeholder substitution.
//!
//! Substitution is literal: `{name}`, `{role}` and `{company}` are replaced
//! with the per-contact values, and any other placeholder is surfaced as a
//! `MissingField` error rather than a crash on a malformed template.

use crate::classify::{Segment, Strength};
use crate::error::OutreachError;
use crate::templates::TemplateSet;

/// Compose the outreach message for one contact. Pure function.
pub fn generate(
    templates: &TemplateSet,
    name: &str,
    role: &str,
    company: &str,
    strength: Strength,
    segment: Segment,
) -> Result<String, OutreachError> {
    let template = templates
        .try_get(segment, strength)
        .ok_or(OutreachError::TemplateNotFound { segment, strength })?;
    render(template, &[("name", name), ("role", role), ("company", company)])
}

/// Substitute `{key}` placeholders in a template.
///
/// Unknown placeholders and unterminated braces are template
/// misconfiguration and yield `MissingField`.
fn render(template: &str, fields: &[(&str, &str)]) -> Result<String, OutreachError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            OutreachError::MissingField(format!("unterminated placeholder near '{{{after}'"))
        })?;
        let key = &after[..close];
        let value = fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| OutreachError::MissingField(key.to_string()))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
