//! Package manager integration
//!
//! This module provides:
//! - Identification of the package manager governing a project
//! - Version listing through the package manager CLI
//! - Execution of the install command after the manifest is rewritten

mod install;
mod versions;

pub use install::{InstallResult, InstallRunner, SystemInstaller};
pub use versions::{parse_version_output, CommandVersionSource, VersionSource};

use crate::manifest::declared_package_manager;
use log::debug;
use std::fmt;
use std::path::Path;

/// Node.js package managers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    /// Any other command, treated like npm
    Other(String),
}

impl PackageManager {
    /// Map a command name to a package manager
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "npm" => PackageManager::Npm,
            "yarn" => PackageManager::Yarn,
            "pnpm" => PackageManager::Pnpm,
            other => PackageManager::Other(other.to_string()),
        }
    }

    /// The executable to run
    pub fn command(&self) -> &str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Other(name) => name,
        }
    }

    /// Arguments listing every published version of `package` as JSON
    pub fn versions_args<'a>(&self, package: &'a str) -> [&'a str; 4] {
        // yarn calls the subcommand `info`, npm and pnpm call it `view`
        let action = match self {
            PackageManager::Yarn => "info",
            _ => "view",
        };
        [action, package, "versions", "--json"]
    }

    /// Arguments for an offline-preferring, quiet install
    pub fn install_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Pnpm => &["install", "--prefer-offline"],
            _ => &["install", "--prefer-offline", "--no-audit", "--no-progress"],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Detect the package manager from lockfiles in `dir`
fn detect_from_lockfiles(dir: &Path) -> Option<PackageManager> {
    // Check for lockfiles in order of preference
    if dir.join("pnpm-lock.yaml").exists() {
        return Some(PackageManager::Pnpm);
    }
    if dir.join("yarn.lock").exists() {
        return Some(PackageManager::Yarn);
    }
    if dir.join("package-lock.json").exists() {
        return Some(PackageManager::Npm);
    }
    None
}

/// Identify the package manager for the project owning `manifest_path`
///
/// Priority: the `packageManager` field, then lockfiles, then npm.
/// Read or parse failures fall through to the next rule.
pub fn identify(manifest_path: &Path) -> PackageManager {
    let declared = std::fs::read_to_string(manifest_path)
        .ok()
        .and_then(|content| declared_package_manager(&content));
    if let Some(name) = declared {
        debug!("packageManager field names {}", name);
        return PackageManager::from_name(&name);
    }

    let dir = manifest_path.parent().unwrap_or(Path::new("."));
    detect_from_lockfiles(dir).unwrap_or(PackageManager::Npm)
}
