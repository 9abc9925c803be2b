//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with locating, parsing or rewriting package.json
//! - VersionQueryError: Issues with listing published versions through the package manager
//! - InstallError: Issues with running the package manager install
//! - PromptError: Terminal interaction failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Version listing related errors
    #[error(transparent)]
    VersionQuery(#[from] VersionQueryError),

    /// Install related errors
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Prompt related errors
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest could be found
    #[error("No package.json found (searched from {path})")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Declared version range that cannot be split into prefix and version
    #[error("invalid version range '{range}' for '{name}': {message}")]
    InvalidVersionRange {
        name: String,
        range: String,
        message: String,
    },

    /// A dependency entry targeted by an update is missing from the file
    #[error("dependency '{name}' not found in '{group}' of {path}")]
    EntryNotFound {
        path: PathBuf,
        group: String,
        name: String,
    },
}

/// Errors related to listing published versions
#[derive(Error, Debug)]
pub enum VersionQueryError {
    /// The package manager could not be started
    #[error("failed to run '{command}' for '{package}': {source}")]
    Spawn {
        package: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The package manager exited with a non-zero status
    #[error("'{command}' failed for '{package}' ({status}): {stderr}")]
    CommandFailed {
        package: String,
        command: String,
        status: String,
        stderr: String,
    },

    /// The output was not a list of version strings
    #[error("invalid version list for '{package}': {message}")]
    InvalidOutput { package: String, message: String },

    /// The query succeeded but listed nothing
    #[error("no versions found for package '{package}'")]
    NoVersions { package: String },
}

/// Errors related to the install step
#[derive(Error, Debug)]
pub enum InstallError {
    /// The install command could not be started or exited with a non-zero status
    #[error("'{command}' failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Errors related to terminal interaction
#[derive(Error, Debug)]
pub enum PromptError {
    /// Reading from or writing to the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidVersionRange error
    pub fn invalid_version_range(
        name: impl Into<String>,
        range: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidVersionRange {
            name: name.into(),
            range: range.into(),
            message: message.into(),
        }
    }
}

impl VersionQueryError {
    /// Creates a new InvalidOutput error
    pub fn invalid_output(package: impl Into<String>, message: impl Into<String>) -> Self {
        VersionQueryError::InvalidOutput {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoVersions error
    pub fn no_versions(package: impl Into<String>) -> Self {
        VersionQueryError::NoVersions {
            package: package.into(),
        }
    }

    /// Name of the package the query was about
    pub fn package(&self) -> &str {
        match self {
            VersionQueryError::Spawn { package, .. }
            | VersionQueryError::CommandFailed { package, .. }
            | VersionQueryError::InvalidOutput { package, .. }
            | VersionQueryError::NoVersions { package } => package,
        }
    }
}
