//! Manifest rewriting
//!
//! This module provides:
//! - In-memory application of an UpdateSet to package.json text
//! - Format preservation: only the targeted value nodes change
//! - Atomic replacement of the manifest on disk

use crate::domain::UpdateSet;
use crate::error::ManifestError;
use crate::manifest::json_edit::{find_value_span, splice};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Apply every decision in `updates` to the manifest text
///
/// Each decision rewrites the value of `<group>.<name>` for the group the
/// dependency was read from. A missing entry fails the whole operation.
pub fn apply_updates(content: &str, updates: &UpdateSet, path: &Path) -> Result<String, ManifestError> {
    let mut edits = Vec::with_capacity(updates.len());

    for decision in updates {
        let dependency = &decision.dependency;
        let group = dependency.kind.manifest_key();

        let span = find_value_span(content, &[group, &dependency.name])
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?
            .ok_or_else(|| ManifestError::EntryNotFound {
                path: path.to_path_buf(),
                group: group.to_string(),
                name: dependency.name.clone(),
            })?;

        let new_range = decision.new_range();
        debug!("{}.{}: {} -> {}", group, dependency.name, &content[span.clone()], new_range);
        let encoded = serde_json::to_string(&new_range)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
        edits.push((span, encoded));
    }

    let updated = splice(content, edits);

    serde_json::from_str::<serde_json::Value>(&updated)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    Ok(updated)
}

/// Rewrite the manifest at `path` with all updates, atomically
///
/// The new content goes to a temporary file in the same directory which is
/// then renamed over the original, so readers see either the old or the new
/// manifest, never a partial one.
pub fn write_updates(path: &Path, updates: &UpdateSet) -> Result<(), ManifestError> {
    if updates.is_empty() {
        return Ok(());
    }

    let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    let updated = apply_updates(&content, updates, path)?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let write_err = |e: std::io::Error| ManifestError::write_error(path, e);

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(updated.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    let permissions = fs::metadata(path).map_err(write_err)?.permissions();
    fs::set_permissions(temp.path(), permissions).map_err(write_err)?;

    temp.persist(path).map_err(|e| write_err(e.error))?;
    debug!("wrote {} update(s) to {}", updates.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, DependencyKind, UpdateDecision, VersionRange};
    use semver::Version;

    fn decision(name: &str, raw: &str, kind: DependencyKind, new: &str) -> UpdateDecision {
        UpdateDecision::new(
            Dependency::new(name, VersionRange::parse(name, raw).unwrap(), kind),
            Version::parse(new).unwrap(),
        )
    }

    fn set(decisions: Vec<UpdateDecision>) -> UpdateSet {
        let mut set = UpdateSet::new();
        for d in decisions {
            set.insert(d);
        }
        set
    }

    const CONTENT: &str = r#"{
  "name": "test-package",
  "version": "1.2.0",
  "description": "depends on lodash ^1.2.0",
  "dependencies": {
    "zod": "^3.0.0",
    "lodash": "^1.2.0",
    "lodash.merge": "^1.2.0"
  },
  "devDependencies": {
    "typescript" :  "~5.0.0"
  }
}
"#;

    #[test]
    fn test_apply_preserves_prefix_and_everything_else() {
        let updates = set(vec![decision("lodash", "^1.2.0", DependencyKind::Normal, "1.3.0")]);
        let result = apply_updates(CONTENT, &updates, Path::new("package.json")).unwrap();

        let expected = CONTENT.replacen(
            r#""lodash": "^1.2.0""#,
            r#""lodash": "^1.3.0""#,
            1,
        );
        assert_eq!(result, expected);
        assert!(result.contains(r#""lodash.merge": "^1.2.0""#));
        assert!(result.contains("depends on lodash ^1.2.0"));
    }

    #[test]
    fn test_apply_multiple_groups_and_formatting() {
        let updates = set(vec![
            decision("typescript", "~5.0.0", DependencyKind::Dev, "5.4.2"),
            decision("zod", "^3.0.0", DependencyKind::Normal, "3.22.4"),
        ]);
        let result = apply_updates(CONTENT, &updates, Path::new("package.json")).unwrap();

        assert!(result.contains(r#""typescript" :  "~5.4.2""#));
        assert!(result.contains(r#""zod": "^3.22.4""#));
        assert_eq!(result.len(), CONTENT.len() + 1);
    }

    #[test]
    fn test_apply_targets_recorded_group_only() {
        let content = r#"{"dependencies": {"react": "^18.0.0"}, "peerDependencies": {"react": "^18.0.0"}}"#;
        let updates = set(vec![decision("react", "^18.0.0", DependencyKind::Peer, "18.3.1")]);
        let result = apply_updates(content, &updates, Path::new("package.json")).unwrap();
        assert_eq!(
            result,
            r#"{"dependencies": {"react": "^18.0.0"}, "peerDependencies": {"react": "^18.3.1"}}"#
        );
    }

    #[test]
    fn test_apply_missing_entry_fails() {
        let updates = set(vec![decision("missing", "1.0.0", DependencyKind::Normal, "2.0.0")]);
        let err = apply_updates(CONTENT, &updates, Path::new("package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::EntryNotFound { .. }));
    }

    #[test]
    fn test_write_updates_replaces_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, CONTENT).unwrap();

        let updates = set(vec![decision("lodash", "^1.2.0", DependencyKind::Normal, "1.3.0")]);
        write_updates(&path, &updates).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""lodash": "^1.3.0""#));
        let leftovers = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should be renamed away");
    }

    #[test]
    fn test_write_updates_failure_leaves_file_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, CONTENT).unwrap();

        let updates = set(vec![
            decision("lodash", "^1.2.0", DependencyKind::Normal, "1.3.0"),
            decision("missing", "1.0.0", DependencyKind::Normal, "2.0.0"),
        ]);
        assert!(write_updates(&path, &updates).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_updates_empty_set_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("package.json");
        write_updates(&path, &UpdateSet::new()).unwrap();
        assert!(!path.exists());
    }
}
