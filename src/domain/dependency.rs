//! Dependency information structures

use super::VersionRange;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The manifest group a dependency was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// `dependencies`
    Normal,
    /// `devDependencies`
    Dev,
    /// `peerDependencies`
    Peer,
}

impl DependencyKind {
    /// All kinds in precedence order
    pub fn all() -> &'static [DependencyKind] {
        &[DependencyKind::Normal, DependencyKind::Dev, DependencyKind::Peer]
    }

    /// The package.json key holding this group
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyKind::Normal => "dependencies",
            DependencyKind::Dev => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DependencyKind::Normal => "normal",
            DependencyKind::Dev => "dev",
            DependencyKind::Peer => "peer",
        };
        f.write_str(label)
    }
}

/// Represents a declared package dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Declared version range
    pub range: VersionRange,
    /// Version present in the local install tree, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<Version>,
    /// The manifest group this dependency belongs to
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a new dependency that is not installed locally
    pub fn new(name: impl Into<String>, range: VersionRange, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            range,
            installed_version: None,
            kind,
        }
    }

    /// Sets the installed version (builder pattern)
    pub fn with_installed(mut self, version: Option<Version>) -> Self {
        self.installed_version = version;
        self
    }

    /// The effective current version: installed if present, declared otherwise
    pub fn current_version(&self) -> &Version {
        self.installed_version.as_ref().unwrap_or(&self.range.version)
    }

    /// Returns true if the installed version differs from the declared one
    pub fn is_drifted(&self) -> bool {
        self.installed_version
            .as_ref()
            .is_some_and(|v| *v != self.range.version)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)?;
        if let Some(ref installed) = self.installed_version {
            write!(f, " ({})", installed)?;
        }
        Ok(())
    }
}
