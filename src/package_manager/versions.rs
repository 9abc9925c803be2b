//! Published version listing through the package manager CLI
//!
//! Runs `<pm> view|info <package> versions --json` in the project directory
//! and parses the JSON written to standard output.

use super::PackageManager;
use crate::domain::VersionList;
use crate::error::VersionQueryError;
use async_trait::async_trait;
use log::debug;
use semver::Version;
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;

/// Source of published versions for a package
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// All published versions of `package`, newest first
    async fn versions(&self, package: &str) -> Result<VersionList, VersionQueryError>;
}

/// Version source backed by the package manager executable
#[derive(Debug, Clone)]
pub struct CommandVersionSource {
    manager: PackageManager,
    working_dir: PathBuf,
}

impl CommandVersionSource {
    pub fn new(manager: PackageManager, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            working_dir: working_dir.into(),
        }
    }
}

#[async_trait]
impl VersionSource for CommandVersionSource {
    async fn versions(&self, package: &str) -> Result<VersionList, VersionQueryError> {
        let args = self.manager.versions_args(package);
        let command_str = format!("{} {}", self.manager.command(), args.join(" "));
        debug!("running '{}' in {}", command_str, self.working_dir.display());

        let output = Command::new(self.manager.command())
            .args(args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| VersionQueryError::Spawn {
                package: package.to_string(),
                command: command_str.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VersionQueryError::CommandFailed {
                package: package.to_string(),
                command: command_str,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_version_output(package, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the JSON printed by a version query
///
/// Accepted shapes:
/// - `["1.0.0", "1.1.0"]`
/// - `"1.0.0"` (npm prints a bare string for single-version packages)
/// - `{"type": "inspect", "data": [...]}` (yarn classic)
///
/// Strings that are not semantic versions are dropped.
pub fn parse_version_output(package: &str, stdout: &str) -> Result<VersionList, VersionQueryError> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| VersionQueryError::invalid_output(package, e.to_string()))?;

    let value = match value {
        Value::Object(mut envelope) => envelope.remove("data").ok_or_else(|| {
            VersionQueryError::invalid_output(package, "object output without 'data'")
        })?,
        other => other,
    };

    let raw: Vec<String> = match value {
        Value::String(single) => vec![single],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(VersionQueryError::invalid_output(
                    package,
                    format!("expected version strings, found {}", other),
                )),
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(VersionQueryError::invalid_output(
                package,
                format!("expected a list of versions, found {}", other),
            ))
        }
    };

    Ok(raw
        .iter()
        .filter_map(|v| {
            Version::parse(v)
                .inspect_err(|e| debug!("{}: ignoring version '{}': {}", package, v, e))
                .ok()
        })
        .collect())
}
