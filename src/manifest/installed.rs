//! Installed version lookup in node_modules
//!
//! Candidate directories, in order:
//! - `node_modules` of the project directory and each of its ancestors
//! - entries of `NODE_PATH`
//! - the project `node_modules`
//! - `node_modules` of the invoking working directory

use log::debug;
use semver::Version;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const NODE_MODULES: &str = "node_modules";

#[derive(Debug, Deserialize)]
struct InstalledPackageJson {
    version: Option<String>,
}

/// Ordered, de-duplicated list of directories to search for installed packages
pub fn search_paths(manifest_path: &Path, cwd: &Path) -> Vec<PathBuf> {
    let project_dir = manifest_path.parent().unwrap_or(Path::new("."));
    let node_path = env::var_os("NODE_PATH");
    let mut paths: Vec<PathBuf> = project_dir
        .ancestors()
        .map(|dir| dir.join(NODE_MODULES))
        .collect();

    if let Some(ref node_path) = node_path {
        paths.extend(env::split_paths(node_path).filter(|p| !p.as_os_str().is_empty()));
    }
    paths.push(project_dir.join(NODE_MODULES));
    paths.push(cwd.join(NODE_MODULES));

    let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}

/// Version of `name` installed in the first matching search directory
///
/// Any lookup failure results in `None`.
pub fn installed_version(search_paths: &[PathBuf], name: &str) -> Option<Version> {
    let manifest = search_paths
        .iter()
        .map(|base| base.join(name).join("package.json"))
        .find(|candidate| candidate.is_file())?;

    debug!("{} resolved to {}", name, manifest.display());

    let content = std::fs::read_to_string(&manifest)
        .inspect_err(|e| debug!("cannot read {}: {}", manifest.display(), e))
        .ok()?;
    let parsed: InstalledPackageJson = serde_json::from_str(&content)
        .inspect_err(|e| debug!("cannot parse {}: {}", manifest.display(), e))
        .ok()?;

    let raw = parsed.version?;
    Version::parse(raw.trim())
        .inspect_err(|e| debug!("installed version '{}' of {} ignored: {}", raw, name, e))
        .ok()
}
