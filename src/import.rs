//! CSV import pipeline.
//!
//! Reads a LinkedIn connection export, suppresses rows already in the
//! contact ledger, classifies each remaining row (segment + strength),
//! drafts its message, and routes it into the exec or non-exec group.
//!
//! Row-level failures (an unparsable connection date, a missing URL) are
//! collected and reported per row; one bad row never aborts the import.
//! Ledger read failures are fatal to the whole operation.

use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::classify::{segment_for_title, strength_for_connection_date};
use crate::db::ContactDb;
use crate::error::OutreachError;
use crate::message;
use crate::templates::TemplateSet;
use crate::working_set::{Contact, WorkingSet};

/// Header columns the export must contain.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "First Name",
    "Last Name",
    "Position",
    "Company",
    "Connected On",
    "URL",
];

/// A rejected row and why.
#[derive(Debug)]
pub struct RowError {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Result of one import run.
#[derive(Debug)]
pub struct ImportReport {
    pub working: WorkingSet,
    pub errors: Vec<RowError>,
    /// Rows suppressed because the ledger already holds their URL.
    pub skipped_contacted: usize,
}

struct ColumnIndex {
    first_name: usize,
    last_name: usize,
    position: usize,
    company: usize,
    connected_on: usize,
    url: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, OutreachError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(c).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(OutreachError::Parse(format!(
                "Export is missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(ColumnIndex {
            first_name: find("First Name").unwrap(),
            last_name: find("Last Name").unwrap(),
            position: find("Position").unwrap(),
            company: find("Company").unwrap(),
            connected_on: find("Connected On").unwrap(),
            url: find("URL").unwrap(),
        })
    }
}

/// Run the import pipeline over a CSV export.
///
/// `now` is the reference date for strength scoring; callers pass today's
/// date, tests pass a fixed one.
pub fn import_csv(
    path: &Path,
    db: &ContactDb,
    templates: &TemplateSet,
    now: NaiveDate,
) -> Result<ImportReport, OutreachError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| OutreachError::Parse(format!("Failed to open {}: {}", path.display(), e)))?;

    let columns = ColumnIndex::resolve(
        reader
            .headers()
            .map_err(|e| OutreachError::Parse(format!("Failed to read header row: {e}")))?,
    )?;

    let mut report = ImportReport {
        working: WorkingSet::default(),
        errors: Vec::new(),
        skipped_contacted: 0,
    };

    for (i, result) in reader.records().enumerate() {
        // Line 1 is the header
        let line = (i + 2) as u64;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.errors.push(RowError {
                    line,
                    reason: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };

        match import_row(&record, &columns, db, templates, now)? {
            RowOutcome::Imported(contact) => report.working.push(contact),
            RowOutcome::AlreadyContacted => report.skipped_contacted += 1,
            RowOutcome::Rejected(reason) => report.errors.push(RowError { line, reason }),
        }
    }

    log::info!(
        "Imported {} rows ({} already contacted, {} rejected) from {}",
        report.working.len(),
        report.skipped_contacted,
        report.errors.len(),
        path.display()
    );
    Ok(report)
}

enum RowOutcome {
    Imported(Contact),
    AlreadyContacted,
    Rejected(String),
}

/// Process one record. Row-level problems become `Rejected`; only ledger
/// failures propagate as errors.
fn import_row(
    record: &StringRecord,
    columns: &ColumnIndex,
    db: &ContactDb,
    templates: &TemplateSet,
    now: NaiveDate,
) -> Result<RowOutcome, OutreachError> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let url = field(columns.url);
    if url.is_empty() {
        return Ok(RowOutcome::Rejected("Missing profile URL".to_string()));
    }

    if db.exists(url)? {
        return Ok(RowOutcome::AlreadyContacted);
    }

    let first_name = field(columns.first_name).to_string();
    let last_name = field(columns.last_name).to_string();
    let company = field(columns.company).to_string();
    let connected_on = field(columns.connected_on).to_string();
    let position = match field(columns.position) {
        "" => None,
        p => Some(p.to_string()),
    };

    let segment = segment_for_title(position.as_deref());
    let strength = match strength_for_connection_date(&connected_on, now) {
        Ok(s) => s,
        Err(e) => return Ok(RowOutcome::Rejected(e.to_string())),
    };
    let message = match message::generate(
        templates,
        &first_name,
        position.as_deref().unwrap_or(""),
        &company,
        strength,
        segment,
    ) {
        Ok(m) => m,
        Err(e) => return Ok(RowOutcome::Rejected(e.to_string())),
    };

    Ok(RowOutcome::Imported(Contact {
        first_name,
        last_name,
        position,
        company,
        connected_on,
        url: url.to_string(),
        segment,
        strength,
        message,
    }))
}
