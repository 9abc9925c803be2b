//! Output formatting for the terminal
//!
//! This module provides:
//! - Banner lines describing the run (manifest, package manager, mode)
//! - Informational and error lines in one consistent format
//! - Text output for dependencies and selected updates

mod text;

pub use text::{TextFormatter, VersionChangeType};

use colored::Colorize;

/// A banner line: `▌ label  value`
pub fn banner(label: &str, value: &str) -> String {
    format!("{} {}  {}", "▌".red(), label.blue().bold(), value.blue())
}

/// An informational line
pub fn info(text: &str) -> String {
    format!(" {}", text.blue().italic())
}

/// An error line; every user-visible failure goes through here
pub fn error_line(text: &str) -> String {
    format!(" {} {}", "ERROR".magenta().bold(), text)
}

/// A warning line for non-fatal problems
pub fn warning_line(text: &str) -> String {
    format!(" {} {}", "WARN".yellow().bold(), text)
}
