//! package.json discovery
//!
//! An explicit path is used as given (a directory means its package.json,
//! relative paths start at the working directory);
//! otherwise the search walks from the starting directory up to the
//! filesystem root and stops at the first package.json.

use log::debug;
use std::path::{Path, PathBuf};

/// File name of the manifest
pub const MANIFEST_FILENAME: &str = "package.json";

/// Locate the project manifest
///
/// Returns `None` when an explicit path does not exist or when no manifest
/// is found between `start_dir` and the root.
pub fn find_manifest(explicit: Option<&Path>, start_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        // Relative paths are taken from `start_dir`
        let path = start_dir.join(path);
        let path = if path.is_dir() {
            path.join(MANIFEST_FILENAME)
        } else {
            path.to_path_buf()
        };
        return path.is_file().then_some(path);
    }

    for dir in start_dir.ancestors() {
        let candidate = dir.join(MANIFEST_FILENAME);
        debug!("looking for {}", candidate.display());
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
