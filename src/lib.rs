//! Core library for the outreach CLI.
//!
//! Triage for a LinkedIn connection export: rule-based segmentation
//! (exec / non-exec by title keywords), connection-age strength scoring,
//! templated message drafting, and a SQLite ledger of profiles already
//! handled. The binary in `main.rs` is the interaction surface; everything
//! with behavior worth testing lives here.

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod linkedin;
pub mod message;
pub mod recent;
pub mod templates;
pub mod util;
pub mod working_set;
