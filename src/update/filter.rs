//! Update policy configuration
//!
//! This module provides the UpdatePolicy struct that encapsulates
//! all options for automatic version selection.

use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::LazyLock;

/// Prerelease of the form `<identifier>.<digits>`, e.g. `rc.2` or `alpha.beta.1`
static NUMBERED_PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<id>.+)\.\d+$").unwrap());

/// Which prerelease versions are eligible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PrereleaseMode {
    /// Stable versions only
    #[default]
    None,
    /// Any numbered prerelease (`-<id>.<n>`)
    Any,
    /// Numbered prereleases with this identifier only
    Tagged(String),
}

impl PrereleaseMode {
    /// Returns true if `version` passes this prerelease filter
    ///
    /// The prerelease modes select prereleases only; stable versions are
    /// excluded by both `Any` and `Tagged`.
    pub fn accepts(&self, version: &Version) -> bool {
        match self {
            PrereleaseMode::None => version.pre.is_empty(),
            PrereleaseMode::Any => numbered_prerelease_id(version).is_some(),
            PrereleaseMode::Tagged(tag) => numbered_prerelease_id(version) == Some(tag.as_str()),
        }
    }
}

impl fmt::Display for PrereleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereleaseMode::None => write!(f, "latest-stable"),
            PrereleaseMode::Any => write!(f, "prerelease-*"),
            PrereleaseMode::Tagged(tag) => write!(f, "prerelease-{}", tag),
        }
    }
}

/// Identifier part of a numbered prerelease (`rc` for `2.0.0-rc.3`)
fn numbered_prerelease_id(version: &Version) -> Option<&str> {
    NUMBERED_PRERELEASE_RE
        .captures(version.pre.as_str())
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Policy configuration for automatic update selection
#[derive(Debug, Clone, Default)]
pub struct UpdatePolicy {
    /// Only dependencies whose name contains this substring are considered
    pub filter: Option<String>,
    /// Prerelease selection
    pub prerelease: PrereleaseMode,
    /// Stay within the current major version and skip prereleases
    pub conservative: bool,
}

impl UpdatePolicy {
    /// Create a new UpdatePolicy with default settings (latest stable, any major)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name substring filter
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the prerelease mode
    pub fn with_prerelease(mut self, mode: PrereleaseMode) -> Self {
        self.prerelease = mode;
        self
    }

    /// Set whether to restrict to non-breaking updates
    pub fn with_conservative(mut self, conservative: bool) -> Self {
        self.conservative = conservative;
        self
    }

    /// Check if a dependency should be evaluated at all
    pub fn should_consider(&self, name: &str) -> bool {
        self.filter.as_deref().is_none_or(|f| name.contains(f))
    }

    /// Short description of the active options
    pub fn describe(&self) -> String {
        let breaking = if self.conservative {
            "non-breaking"
        } else {
            "allow-breaking"
        };
        format!("{} | {}", breaking, self.prerelease)
    }
}
