//! CLI argument parsing module for nui

use crate::update::{PrereleaseMode, UpdatePolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Interactively update package.json dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nui",
    version,
    about = "Interactively update package.json dependencies"
)]
pub struct CliArgs {
    /// Path to package.json or its directory (default: search upward from the current directory)
    #[arg(short, long, global = true, env = "NUI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Package manager to use instead of the detected one (npm, yarn, pnpm, ...)
    #[arg(short, long, global = true, env = "NUI_PACKAGE_MANAGER")]
    pub package_manager: Option<String>,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick packages and versions from menus (default)
    Interactive,
    /// Update every dependency to its newest eligible version
    Auto(AutoArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Only update dependencies whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Update to prereleases; give a tag (e.g. rc) to only take that prerelease
    #[arg(long, value_name = "TAG", num_args = 0..=1)]
    pub pre: Option<Option<String>>,

    /// Only non-breaking updates (same major version, no prereleases)
    #[arg(short, long, conflicts_with = "pre")]
    pub save: bool,
}

impl CliArgs {
    /// The selected subcommand, interactive when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }
}

impl AutoArgs {
    /// Convert the flags to an update policy
    pub fn policy(&self) -> UpdatePolicy {
        let prerelease = match self.pre {
            None => PrereleaseMode::None,
            Some(None) => PrereleaseMode::Any,
            Some(Some(ref tag)) => PrereleaseMode::Tagged(tag.clone()),
        };

        let mut policy = UpdatePolicy::new()
            .with_prerelease(prerelease)
            .with_conservative(self.save);
        if let Some(ref filter) = self.filter {
            policy = policy.with_filter(filter.clone());
        }
        policy
    }
}
