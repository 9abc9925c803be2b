//! Declared version ranges from package.json
//!
//! A declared range is split into the range operator (`^`, `~`, `>=`, ...)
//! and a semantic-version core:
//! - `^1.2.3` -> prefix `^`, version `1.2.3`
//! - `~1.2` -> prefix `~`, version `1.2.0`
//! - `1.0.0-rc.1` -> no prefix, version `1.0.0-rc.1`
//!
//! Wildcards, compound ranges and dist-tags are rejected.

use crate::error::ManifestError;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static CORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?((?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$")
        .unwrap()
});

/// A declared version range with its original string representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    /// The raw range as it appears in the manifest
    pub raw: String,
    /// Leading range operator, possibly empty
    pub prefix: String,
    /// Normalised version core
    pub version: Version,
}

impl VersionRange {
    /// Parse a declared range for dependency `name`
    pub fn parse(name: &str, raw: &str) -> Result<Self, ManifestError> {
        let trimmed = raw.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ManifestError::invalid_version_range(name, raw, "no version number"))?;

        let (prefix, core) = trimmed.split_at(split);
        if !prefix.chars().all(is_operator_char) {
            return Err(ManifestError::invalid_version_range(
                name,
                raw,
                format!("'{}' is not a range operator", prefix.trim_end()),
            ));
        }

        let caps = CORE_RE.captures(core).ok_or_else(|| {
            ManifestError::invalid_version_range(name, raw, "not a single semantic version")
        })?;

        let normalized = format!(
            "{}.{}.{}{}",
            &caps[1],
            caps.get(2).map_or("0", |m| m.as_str()),
            caps.get(3).map_or("0", |m| m.as_str()),
            caps.get(4).map_or("", |m| m.as_str()),
        );

        let version = Version::parse(&normalized)
            .map_err(|e| ManifestError::invalid_version_range(name, raw, e.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            prefix: prefix.to_string(),
            version,
        })
    }

    /// Formats a new version while preserving the declared prefix byte for byte
    pub fn format_updated(&self, new_version: &Version) -> String {
        format!("{}{}", self.prefix, new_version)
    }
}

/// Git refs, `npm:` aliases and paths carry other characters before the digits
fn is_operator_char(c: char) -> bool {
    matches!(c, '^' | '~' | '<' | '>' | '=' | 'v') || c.is_whitespace()
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
