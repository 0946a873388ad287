//! Contact classification: title-based segmentation and connection-age scoring.
//!
//! Both rules are pure functions. Segmentation is a case-insensitive
//! substring match against a fixed executive-title list; scoring buckets the
//! elapsed time since the connection date into three strength tiers. The
//! caller supplies `now` so results are deterministic under test.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::OutreachError;

/// Titles that classify a contact as executive. Matched case-insensitively
/// as substrings of the position field.
pub const EXEC_TITLE_KEYWORDS: &[&str] = &[
    "cto",
    "ceo",
    "team lead",
    "manager",
    "director",
    "vp",
    "co-founder",
    "coo",
    "cco",
];

/// Source format for the `Connected On` column, e.g. "07 Feb 2023".
pub const CONNECTED_ON_FORMAT: &str = "%d %b %Y";

/// Contact classification by job title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "exec")]
    Exec,
    #[serde(rename = "non-exec")]
    NonExec,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Exec => "exec",
            Segment::NonExec => "non-exec",
        }
    }

    /// The other segment. Used when the user re-categorizes a row.
    pub fn other(self) -> Segment {
        match self {
            Segment::Exec => Segment::NonExec,
            Segment::NonExec => Segment::Exec,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = OutreachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exec" => Ok(Segment::Exec),
            "non-exec" | "nonexec" => Ok(Segment::NonExec),
            other => Err(OutreachError::Parse(format!("Unknown segment: {other}"))),
        }
    }
}

/// Relationship-age tier derived from the connection date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl Strength {
    pub fn as_str(self) -> &'static str {
        match self {
            Strength::Strong => "Strong",
            Strength::Moderate => "Moderate",
            Strength::Weak => "Weak",
        }
    }

    /// All tiers, in display order.
    pub const ALL: [Strength; 3] = [Strength::Strong, Strength::Moderate, Strength::Weak];
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = OutreachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strong" => Ok(Strength::Strong),
            "moderate" => Ok(Strength::Moderate),
            "weak" => Ok(Strength::Weak),
            other => Err(OutreachError::Parse(format!("Unknown strength: {other}"))),
        }
    }
}

/// Classify a job title as executive or non-executive.
///
/// An absent or empty title is always non-executive. No error cases.
pub fn segment_for_title(title: Option<&str>) -> Segment {
    let title = match title {
        Some(t) => t.to_lowercase(),
        None => return Segment::NonExec,
    };
    if EXEC_TITLE_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        Segment::Exec
    } else {
        Segment::NonExec
    }
}

/// Parse a `Connected On` value (`DD Mon YYYY`).
pub fn parse_connected_on(value: &str) -> Result<NaiveDate, OutreachError> {
    NaiveDate::parse_from_str(value.trim(), CONNECTED_ON_FORMAT).map_err(|_| {
        OutreachError::Parse(format!(
            "Invalid connection date '{}' (expected e.g. '07 Feb 2023')",
            value.trim()
        ))
    })
}

/// Score relationship strength from the connection date.
///
/// Elapsed time is `days / 365.0`, with no leap-year adjustment. More than
/// 3 years is Strong, 1 to 3 years inclusive is Moderate (both endpoints),
/// under 1 year is Weak.
pub fn strength_for_connection_date(
    connected_on: &str,
    now: NaiveDate,
) -> Result<Strength, OutreachError> {
    let date = parse_connected_on(connected_on)?;
    let years = (now - date).num_days() as f64 / 365.0;
    Ok(if years > 3.0 {
        Strength::Strong
    } else if years >= 1.0 {
        Strength::Moderate
    } else {
        Strength::Weak
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exec_keywords_any_case() {
        assert_eq!(segment_for_title(Some("CTO")), Segment::Exec);
        assert_eq!(segment_for_title(Some("chief people officer & CO-Founder")), Segment::Exec);
        assert_eq!(segment_for_title(Some("Engineering Manager")), Segment::Exec);
        assert_eq!(segment_for_title(Some("team lead, payments")), Segment::Exec);
        assert_eq!(segment_for_title(Some("VP of Sales")), Segment::Exec);
    }

    #[test]
    fn test_non_exec_titles() {
        assert_eq!(segment_for_title(Some("Software Engineer")), Segment::NonExec);
        assert_eq!(segment_for_title(Some("Designer")), Segment::NonExec);
        assert_eq!(segment_for_title(Some("")), Segment::NonExec);
        assert_eq!(segment_for_title(None), Segment::NonExec);
    }

    #[test]
    fn test_strength_boundaries() {
        let now = date(2024, 2, 7);
        // Exactly 3 years (1095 days, no leap day in range): Moderate
        assert_eq!(
            strength_for_connection_date("07 Feb 2021", now).unwrap(),
            Strength::Moderate
        );
        // One day past 3 years: Strong
        assert_eq!(
            strength_for_connection_date("06 Feb 2021", now).unwrap(),
            Strength::Strong
        );
        // Exactly 1 year: Moderate
        assert_eq!(
            strength_for_connection_date("07 Feb 2023", now).unwrap(),
            Strength::Moderate
        );
        // One day short of 1 year: Weak
        assert_eq!(
            strength_for_connection_date("08 Feb 2023", now).unwrap(),
            Strength::Weak
        );
    }

    #[test]
    fn test_recent_connection_is_weak() {
        let now = date(2024, 2, 7);
        assert_eq!(
            strength_for_connection_date("01 Jan 2024", now).unwrap(),
            Strength::Weak
        );
    }

    #[test]
    fn test_bad_date_is_a_parse_error_not_a_panic() {
        let now = date(2024, 2, 7);
        let err = strength_for_connection_date("2023-02-07", now).unwrap_err();
        assert!(matches!(err, OutreachError::Parse(_)));
        let err = strength_for_connection_date("", now).unwrap_err();
        assert!(matches!(err, OutreachError::Parse(_)));
    }

    #[test]
    fn test_connected_on_trims_whitespace() {
        assert_eq!(
            parse_connected_on("  07 Feb 2023 ").unwrap(),
            date(2023, 2, 7)
        );
    }

    #[test]
    fn test_segment_serde_keys() {
        assert_eq!(serde_json::to_string(&Segment::Exec).unwrap(), "\"exec\"");
        assert_eq!(serde_json::to_string(&Segment::NonExec).unwrap(), "\"non-exec\"");
        assert_eq!(serde_json::to_string(&Strength::Strong).unwrap(), "\"Strong\"");
    }
}
