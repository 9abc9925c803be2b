//! package.json reader
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//!
//! Groups are read in that order; a name declared in more than one group is
//! kept from the first group only.

use crate::domain::{Dependency, DependencyKind, VersionRange};
use crate::error::ManifestError;
use crate::manifest::installed;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Dependencies read from one manifest
#[derive(Debug, Default)]
pub struct ManifestDependencies {
    /// Records in manifest order
    pub dependencies: Vec<Dependency>,
    /// Entries whose declared range could not be parsed
    pub rejected: Vec<ManifestError>,
}

/// Parse the dependency groups of a package.json document
///
/// Installed versions are not resolved here.
pub fn parse_dependencies(content: &str, path: &Path) -> Result<ManifestDependencies, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    let mut result = ManifestDependencies::default();
    // Every name seen so far, accepted or rejected
    let mut seen: HashSet<&str> = HashSet::new();

    for kind in DependencyKind::all() {
        let key = kind.manifest_key();
        let Some(group) = json.get(key) else {
            continue;
        };
        let Some(entries) = group.as_object() else {
            warn!("ignoring '{}' in {}: not an object", key, path.display());
            continue;
        };

        for (name, value) in entries {
            if !seen.insert(name.as_str()) {
                debug!("{} already declared, skipping the {} entry", name, key);
                continue;
            }

            let Some(raw) = value.as_str() else {
                let err = ManifestError::invalid_version_range(
                    name.as_str(),
                    value.to_string(),
                    "version is not a string",
                );
                warn!("{}", err);
                result.rejected.push(err);
                continue;
            };

            match VersionRange::parse(name, raw) {
                Ok(range) => result
                    .dependencies
                    .push(Dependency::new(name.as_str(), range, *kind)),
                Err(e) => {
                    warn!("{}", e);
                    result.rejected.push(e);
                }
            }
        }
    }

    Ok(result)
}

/// Read and parse a manifest, resolving installed versions
pub fn read_dependencies(path: &Path, cwd: &Path) -> Result<ManifestDependencies, ManifestError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    let mut result = parse_dependencies(&content, path)?;

    let search_paths = installed::search_paths(path, cwd);
    for dependency in &mut result.dependencies {
        dependency.installed_version = installed::installed_version(&search_paths, &dependency.name);
    }

    Ok(result)
}

/// Name part of the `packageManager` field (`pnpm@8.15.0` -> `pnpm`)
pub fn declared_package_manager(content: &str) -> Option<String> {
    let json: Value = serde_json::from_str(content).ok()?;
    let field = json.get("packageManager")?.as_str()?;
    let name = field.split('@').next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use std::fs;

    fn parse(content: &str) -> ManifestDependencies {
        parse_dependencies(content, Path::new("package.json")).unwrap()
    }

    #[test]
    fn test_parse_all_groups_in_order() {
        let content = r#"{
            "peerDependencies": { "react": "^18.0.0" },
            "dependencies": { "zod": "^3.0.0", "axios": "~1.6.0" },
            "devDependencies": { "typescript": "^5.0.0" }
        }"#;

        let deps = parse(content).dependencies;
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["zod", "axios", "typescript", "react"]);
        assert_eq!(deps[0].kind, DependencyKind::Normal);
        assert_eq!(deps[2].kind, DependencyKind::Dev);
        assert_eq!(deps[3].kind, DependencyKind::Peer);
    }

    #[test]
    fn test_parse_splits_ranges() {
        let deps = parse(r#"{"dependencies": {"express": "~4.18.2"}}"#).dependencies;
        assert_eq!(deps[0].range.prefix, "~");
        assert_eq!(deps[0].range.version, Version::new(4, 18, 2));
        assert!(deps[0].installed_version.is_none());
    }

    #[test]
    fn test_duplicate_names_first_group_wins() {
        let content = r#"{
            "dependencies": { "react": "^18.2.0" },
            "peerDependencies": { "react": "^17.0.0 || ^18.0.0" },
            "devDependencies": { "react": "18.2.0" }
        }"#;

        let result = parse(content);
        assert_eq!(result.dependencies.len(), 1);
        assert_eq!(result.dependencies[0].kind, DependencyKind::Normal);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn test_rejected_entry_still_claims_its_name() {
        let content = r#"{
            "dependencies": { "react": "latest" },
            "devDependencies": { "react": "^18.2.0" }
        }"#;

        let result = parse(content);
        assert!(result.dependencies.is_empty());
        assert_eq!(result.rejected.len(), 1);
    }

    #[test]
    fn test_unparseable_ranges_are_rejected() {
        let content = r#"{
            "dependencies": {
                "lodash": "^4.17.21",
                "next": "latest",
                "local": "file:../local",
                "weird": 42
            }
        }"#;

        let result = parse(content);
        assert_eq!(result.dependencies.len(), 1);
        assert_eq!(result.rejected.len(), 3);
        assert!(result
            .rejected
            .iter()
            .all(|e| matches!(e, ManifestError::InvalidVersionRange { .. })));
    }

    #[test]
    fn test_parse_empty_object() {
        let result = parse("{}");
        assert!(result.dependencies.is_empty());
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn test_non_object_group_is_ignored() {
        let result = parse(r#"{"dependencies": ["lodash"]}"#);
        assert!(result.dependencies.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_dependencies("not json", Path::new("package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::JsonParseError { .. }));
    }

    #[test]
    fn test_read_dependencies_resolves_installed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = temp_dir.path().join("package.json");
        fs::write(
            &manifest,
            r#"{"dependencies": {"lodash": "^4.17.0", "react": "^18.0.0"}}"#,
        )
        .unwrap();
        let installed = temp_dir.path().join("node_modules").join("lodash");
        fs::create_dir_all(&installed).unwrap();
        fs::write(installed.join("package.json"), r#"{"version": "4.17.21"}"#).unwrap();

        let result = read_dependencies(&manifest, temp_dir.path()).unwrap();
        assert_eq!(result.dependencies.len(), 2);
        assert_eq!(
            result.dependencies[0].installed_version,
            Some(Version::new(4, 17, 21))
        );
    }

    #[test]
    fn test_read_dependencies_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err =
            read_dependencies(&temp_dir.path().join("package.json"), temp_dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[test]
    fn test_declared_package_manager() {
        assert_eq!(
            declared_package_manager(r#"{"packageManager": "pnpm@8.15.0"}"#),
            Some("pnpm".to_string())
        );
        assert_eq!(
            declared_package_manager(r#"{"packageManager": "yarn@4.0.2+sha256.abc"}"#),
            Some("yarn".to_string())
        );
        assert_eq!(declared_package_manager(r#"{"packageManager": "@1.0.0"}"#), None);
        assert_eq!(declared_package_manager(r#"{"name": "x"}"#), None);
        assert_eq!(declared_package_manager("not json"), None);
    }
}
