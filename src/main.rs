//! `outreach`: triage a LinkedIn connection export from the terminal.
//!
//! The interactive `review` command stands in for the original review tabs:
//! pick a row, adjust its strength or segment, open the profile with the
//! drafted message on the clipboard, then mark it sent or skip it. Sent and
//! skipped profiles land in the ledger and are excluded from later imports.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};

use outreach::classify::{Segment, Strength};
use outreach::config::{Config, Session};
use outreach::db::ContactDb;
use outreach::error::OutreachError;
use outreach::import::{import_csv, ImportReport};
use outreach::linkedin::LinkedInFetcher;
use outreach::recent::{self, RecentContactsFetcher};
use outreach::templates::TemplateSet;
use outreach::util;
use outreach::working_set::WorkingSet;

#[derive(Parser)]
#[command(name = "outreach", version, about = "LinkedIn connection triage and outreach drafting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a connection export and print the triaged groups
    Import {
        /// Path to the LinkedIn connections CSV
        csv: PathBuf,
    },
    /// Import, then review rows interactively (mark sent, skip, move, re-score)
    Review {
        /// Path to the LinkedIn connections CSV
        csv: PathBuf,
    },
    /// List every profile already in the contact ledger
    Contacted,
    /// Inspect or edit the message templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },
    /// Re-fetch the recently-contacted names from LinkedIn and cache them
    RefreshRecent,
}

#[derive(Subcommand)]
enum TemplatesAction {
    /// Print all templates
    Show,
    /// Overwrite the stored templates with the built-in defaults
    Reset,
    /// Replace one template (segment: exec|non-exec, strength: strong|moderate|weak)
    Set {
        segment: Segment,
        strength: Strength,
        text: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Import { csv } => cmd_import(&csv),
        Command::Review { csv } => cmd_review(&csv),
        Command::Contacted => cmd_contacted(),
        Command::Templates { action } => cmd_templates(action),
        Command::RefreshRecent => cmd_refresh_recent(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        eprintln!("  {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

fn load_templates() -> Result<TemplateSet, OutreachError> {
    util::ensure_data_dir()?;
    Ok(TemplateSet::load_or_default(&util::templates_path()?))
}

fn run_import(csv: &std::path::Path, db: &ContactDb) -> Result<(ImportReport, TemplateSet), OutreachError> {
    let templates = load_templates()?;
    let report = import_csv(csv, db, &templates, Local::now().date_naive())?;
    Ok((report, templates))
}

fn cmd_import(csv: &std::path::Path) -> Result<(), OutreachError> {
    let db = ContactDb::open()?;
    let (report, _) = run_import(csv, &db)?;
    print_groups(&report.working);
    print_import_summary(&report);
    Ok(())
}

fn cmd_contacted() -> Result<(), OutreachError> {
    let db = ContactDb::open()?;
    let entries = db.list_all()?;
    if entries.is_empty() {
        println!("No contacted profiles yet.");
        return Ok(());
    }
    println!("{:<50} {:<12} {:<5} message", "url", "last", "sent");
    for entry in entries {
        println!(
            "{:<50} {:<12} {:<5} {}",
            entry.linkedin_url,
            entry.last_contacted.as_deref().unwrap_or("-"),
            if entry.sent { "Yes" } else { "No" },
            entry.message_used.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn cmd_templates(action: TemplatesAction) -> Result<(), OutreachError> {
    util::ensure_data_dir()?;
    let path = util::templates_path()?;
    match action {
        TemplatesAction::Show => {
            let templates = TemplateSet::load_or_default(&path);
            for segment in [Segment::Exec, Segment::NonExec] {
                for strength in Strength::ALL {
                    println!("[{segment} / {strength}]");
                    println!("{}\n", templates.try_get(segment, strength).unwrap_or(""));
                }
            }
        }
        TemplatesAction::Reset => {
            TemplateSet::reset(&path)?;
            println!("Templates reset to defaults.");
        }
        TemplatesAction::Set {
            segment,
            strength,
            text,
        } => {
            let mut templates = TemplateSet::load_or_default(&path);
            templates.set(segment, strength, text);
            templates.save(&path)?;
            println!("Template for {segment}/{strength} updated.");
        }
    }
    Ok(())
}

fn cmd_refresh_recent() -> Result<(), OutreachError> {
    util::ensure_data_dir()?;
    let session = build_session()?;
    let fetcher = LinkedInFetcher::new()?;
    let names = fetcher.fetch(&session)?;
    recent::save_cache(&util::recently_contacted_path()?, &names)?;
    println!("Cached {} recently-contacted names.", names.len());
    Ok(())
}

/// Load the stored username (prompting and saving it when absent) and
/// prompt for the password. The password lives only in this session value.
fn build_session() -> Result<Session, OutreachError> {
    let config_path = util::config_path()?;
    let mut config = Config::load(&config_path);
    if config.linkedin_username.is_empty() {
        config.linkedin_username = prompt("LinkedIn username: ")?;
        config.save(&config_path)?;
    }
    let password = prompt(&format!("LinkedIn password for {}: ", config.linkedin_username))?;
    Ok(Session::new(config.linkedin_username, password))
}

// ---------------------------------------------------------------------------
// Interactive review loop
// ---------------------------------------------------------------------------

fn cmd_review(csv: &std::path::Path) -> Result<(), OutreachError> {
    let db = ContactDb::open()?;
    let (mut report, templates) = run_import(csv, &db)?;
    print_import_summary(&report);
    print_groups(&report.working);
    println!("Commands: show|strength|move|open|sent|skip <e|n> <#>, hide, list, quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["list"] | ["l"] => print_groups(&report.working),
            ["hide"] => match hide_recently_contacted(&mut report.working) {
                Ok(removed) => println!("Removed {removed} recently-contacted rows."),
                Err(e) => report_action_error(&e),
            },
            ["show", seg, idx] => with_row(&report.working, seg, idx, |c| {
                println!("{}, {} at {} ({})", c.display_name(), c.position.as_deref().unwrap_or("-"), c.company, c.connected_on);
                println!("{} / {}  {}", c.segment, c.strength, c.url);
                println!("{}", c.message);
            }),
            ["strength", seg, idx, tier] => {
                let strength = match tier.parse::<Strength>() {
                    Ok(s) => s,
                    Err(e) => {
                        report_action_error(&e);
                        continue;
                    }
                };
                if let Some(url) = row_url(&report.working, seg, idx) {
                    match report.working.set_strength(&url, strength, &templates) {
                        Ok(_) => println!("Message regenerated at strength {strength}."),
                        Err(e) => report_action_error(&e),
                    }
                }
            }
            ["move", seg, idx] => {
                if let Some(url) = row_url(&report.working, seg, idx) {
                    report.working.move_to_other_segment(&url);
                    println!("Moved to the other segment.");
                }
            }
            ["open", seg, idx] => with_row(&report.working, seg, idx, |c| {
                if let Err(e) = open::that(&c.url) {
                    eprintln!("Failed to open browser: {e}");
                }
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(c.message.clone())) {
                    Ok(()) => println!("Profile opened; message copied to clipboard."),
                    Err(e) => eprintln!("Clipboard unavailable: {e}"),
                }
            }),
            ["sent", seg, idx] => finish_row(&mut report.working, &db, seg, idx, true),
            ["skip", seg, idx] => finish_row(&mut report.working, &db, seg, idx, false),
            _ => println!("Unrecognized command. Try: show e 0, strength n 2 weak, sent e 1, hide, quit"),
        }
        if report.working.is_empty() {
            println!("Working set is empty; all rows handled.");
            break;
        }
    }
    Ok(())
}

/// Write the ledger entry, and only on success drop the row from the
/// working set. A failed write leaves the row in place.
fn finish_row(working: &mut WorkingSet, db: &ContactDb, seg: &str, idx: &str, sent: bool) {
    let Some(url) = row_url(working, seg, idx) else {
        return;
    };
    let message = if sent {
        working.find(&url).map(|c| c.message.clone()).unwrap_or_default()
    } else {
        String::new()
    };
    match db.log_outreach(&url, &message, sent) {
        Ok(()) => {
            working.remove(&url);
            println!("{} {}.", if sent { "Marked sent:" } else { "Skipped:" }, url);
        }
        Err(e) => report_action_error(&OutreachError::from(e)),
    }
}

/// Apply the recently-contacted filter, fetching and caching the name list
/// first when no cache exists.
fn hide_recently_contacted(working: &mut WorkingSet) -> Result<usize, OutreachError> {
    let path = util::recently_contacted_path()?;
    let names = match recent::load_cache(&path)? {
        Some(names) => names,
        None => {
            println!("No cached names; fetching from LinkedIn.");
            let session = build_session()?;
            let names = LinkedInFetcher::new()?.fetch(&session)?;
            recent::save_cache(&path, &names)?;
            names
        }
    };
    Ok(recent::filter_recent(working, &names))
}

fn parse_segment_arg(seg: &str) -> Option<Segment> {
    match seg {
        "e" | "exec" => Some(Segment::Exec),
        "n" | "non-exec" => Some(Segment::NonExec),
        _ => {
            println!("Segment must be 'e' or 'n'.");
            None
        }
    }
}

fn row_url(working: &WorkingSet, seg: &str, idx: &str) -> Option<String> {
    let segment = parse_segment_arg(seg)?;
    let index: usize = match idx.parse() {
        Ok(i) => i,
        Err(_) => {
            println!("Row index must be a number.");
            return None;
        }
    };
    match working.group(segment).get(index) {
        Some(contact) => Some(contact.url.clone()),
        None => {
            println!("No row {index} in the {segment} group.");
            None
        }
    }
}

fn with_row<F: FnOnce(&outreach::working_set::Contact)>(
    working: &WorkingSet,
    seg: &str,
    idx: &str,
    f: F,
) {
    if let Some(url) = row_url(working, seg, idx) {
        if let Some(contact) = working.find(&url) {
            f(contact);
        }
    }
}

fn report_action_error(e: &OutreachError) {
    eprintln!("Action failed: {e}");
    eprintln!("  {}", e.recovery_suggestion());
}

fn print_groups(working: &WorkingSet) {
    for segment in [Segment::Exec, Segment::NonExec] {
        let group = working.group(segment);
        println!("\n== {} ({}) ==", segment, group.len());
        for (i, c) in group.iter().enumerate() {
            println!(
                "{:>3}  {:<24} {:<28} {:<20} {:<10} {}",
                i,
                c.display_name(),
                c.position.as_deref().unwrap_or("-"),
                c.company,
                c.strength,
                c.url,
            );
        }
    }
}

fn print_import_summary(report: &ImportReport) {
    println!(
        "\n{} rows imported, {} already contacted, {} rejected.",
        report.working.len(),
        report.skipped_contacted,
        report.errors.len()
    );
    for err in &report.errors {
        println!("  line {}: {}", err.line, err.reason);
    }
}

fn prompt(label: &str) -> Result<String, OutreachError> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
