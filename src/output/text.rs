//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Semantic version change type indication (major/minor/patch)
//! - Dependency names coloured by manifest group
//! - The table of selected updates

use crate::domain::{Dependency, DependencyKind, UpdateSet};
use colored::Colorize;
use semver::Version;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch or prerelease change (fixes)
    Patch,
    /// Same version
    None,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &Version, new: &Version) -> Self {
        if old == new {
            VersionChangeType::None
        } else if old.major != new.major {
            VersionChangeType::Major
        } else if old.minor != new.minor {
            VersionChangeType::Minor
        } else {
            VersionChangeType::Patch
        }
    }
}

/// Text formatter for human-readable output
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Create a new text formatter with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Colour `text` by the dependency group
    pub fn kind_colored(&self, kind: DependencyKind, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match kind {
            DependencyKind::Normal => text.green().to_string(),
            DependencyKind::Dev => text.blue().to_string(),
            DependencyKind::Peer => text.yellow().to_string(),
        }
    }

    /// One line describing a dependency for the package picker
    pub fn dependency_line(&self, dependency: &Dependency) -> String {
        let marker = self.kind_colored(dependency.kind, "█");
        let declared = format!("{}@{}", dependency.name, dependency.range);
        let installed = match dependency.installed_version {
            Some(ref v) if self.color && dependency.is_drifted() => {
                format!(" ({})", v).bold().to_string()
            }
            Some(ref v) if self.color => format!(" ({})", v).dimmed().to_string(),
            Some(ref v) => format!(" ({})", v),
            None => String::new(),
        };
        format!("{} {}{}", marker, declared, installed)
    }

    /// Colour a new version by how far it moves from `old`
    fn bump_colored(&self, old: &Version, new: &Version, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match VersionChangeType::from_versions(old, new) {
            VersionChangeType::Major => text.red().bold().to_string(),
            VersionChangeType::Minor => text.yellow().bold().to_string(),
            VersionChangeType::Patch => text.bold().to_string(),
            VersionChangeType::None => text.dimmed().to_string(),
        }
    }

    /// Write the table of selected updates
    pub fn format_updates(&self, updates: &UpdateSet, writer: &mut dyn Write) -> std::io::Result<()> {
        let heading = "Selected packages to update:";
        if self.color {
            writeln!(writer, "{}", heading.dimmed())?;
        } else {
            writeln!(writer, "{}", heading)?;
        }

        let rows: Vec<(String, String, String)> = updates
            .iter()
            .map(|d| {
                (
                    d.dependency.name.clone(),
                    d.dependency.current_version().to_string(),
                    d.new_range(),
                )
            })
            .collect();
        let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
        let old_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);

        for (decision, (name, old, new)) in updates.iter().zip(rows.iter()) {
            let name = format!("{:width$}", name, width = name_width);
            let old = format!("{:width$}", old, width = old_width);
            let current = decision.dependency.current_version();

            if self.color {
                writeln!(
                    writer,
                    "- {} {} {} {}",
                    self.kind_colored(decision.dependency.kind, &name),
                    old.dimmed(),
                    "►".dimmed().bold(),
                    self.bump_colored(current, &decision.new_version, new)
                )?;
            } else {
                writeln!(writer, "- {} {} ► {}", name, old, new)?;
            }
        }
        Ok(())
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}
