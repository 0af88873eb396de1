//! Output module for presenting crawl outcomes
//!
//! This module handles:
//! - Human-readable summaries for the terminal
//! - JSON export of the full outcome

mod report;

pub use report::{render_json, render_text, OutcomeReport};
