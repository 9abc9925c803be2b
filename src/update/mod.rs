//! Update judgment logic for dependencies
//!
//! This module provides:
//! - Update policy configuration from CLI args
//! - Eligible version computation (floor, prerelease, major lock)
//! - Update judgment for automatic and interactive selection

mod filter;

pub use filter::{PrereleaseMode, UpdatePolicy};

use crate::domain::{Dependency, UpdateDecision, VersionList};
use semver::Version;

/// Outcome of an operator's version pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Record this decision
    Update(UpdateDecision),
    /// The pick equals the current version; nothing to change
    Keep,
}

/// Versions in `versions` eligible under `policy`, newest first
///
/// `versions` must already be sorted descending. Only versions at or above
/// `floor` are candidates; the prerelease filter and the major lock then
/// narrow the candidates further. Build metadata is ignored when comparing.
pub fn eligible_versions<'a>(
    versions: &'a VersionList,
    floor: &Version,
    policy: &UpdatePolicy,
) -> Vec<&'a Version> {
    versions
        .iter()
        .take_while(|v| v.cmp_precedence(floor).is_ge())
        .filter(|v| policy.prerelease.accepts(v))
        .filter(|v| !policy.conservative || (v.major == floor.major && v.pre.is_empty()))
        .collect()
}

/// Update judgment engine that decides whether to update a dependency
pub struct UpdateJudge {
    /// Policy configuration
    policy: UpdatePolicy,
}

impl UpdateJudge {
    /// Create a new UpdateJudge with the given policy
    pub fn new(policy: UpdatePolicy) -> Self {
        Self { policy }
    }

    /// Check if a dependency should be evaluated at all
    pub fn should_consider(&self, dependency: &Dependency) -> bool {
        self.policy.should_consider(&dependency.name)
    }

    /// Pick the highest eligible version, if it is newer than the current one
    pub fn decide_auto(&self, dependency: &Dependency, versions: &VersionList) -> Option<UpdateDecision> {
        if !self.should_consider(dependency) {
            return None;
        }

        let floor = dependency.current_version();
        let target = eligible_versions(versions, floor, &self.policy)
            .into_iter()
            .next()?;

        target
            .cmp_precedence(floor)
            .is_gt()
            .then(|| UpdateDecision::new(dependency.clone(), target.clone()))
    }

    /// Turn an operator's pick into a choice
    ///
    /// Interactive picks are not filtered by the policy: any listed version,
    /// including a downgrade, is accepted.
    pub fn decide_interactive(dependency: &Dependency, picked: &Version) -> Choice {
        if picked.cmp_precedence(dependency.current_version()).is_eq() {
            Choice::Keep
        } else {
            Choice::Update(UpdateDecision::new(dependency.clone(), picked.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKind, VersionRange};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn list(versions: &[&str]) -> VersionList {
        versions.iter().map(|s| v(s)).collect()
    }

    fn make_dependency(name: &str, declared: &str, installed: Option<&str>) -> Dependency {
        Dependency::new(
            name,
            VersionRange::parse(name, declared).unwrap(),
            DependencyKind::Normal,
        )
        .with_installed(installed.map(v))
    }

    fn decide(policy: UpdatePolicy, dep: &Dependency, versions: &VersionList) -> Option<Version> {
        UpdateJudge::new(policy)
            .decide_auto(dep, versions)
            .map(|d| d.new_version)
    }

    #[test]
    fn test_judge_simple_update() {
        let dep = make_dependency("lodash", "^1.0.0", None);
        let versions = list(&["1.0.0", "1.1.0", "2.0.0"]);
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), Some(v("2.0.0")));
    }

    #[test]
    fn test_judge_floor_uses_installed_version() {
        let dep = make_dependency("lodash", "^1.0.0", Some("1.5.0"));
        let versions = list(&["1.0.0", "1.4.0"]);
        // 1.4.0 is newer than declared but older than installed
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), None);
    }

    #[test]
    fn test_judge_already_latest_is_no_op() {
        let dep = make_dependency("lodash", "^2.0.0", None);
        let versions = list(&["1.0.0", "2.0.0"]);
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), None);
    }

    #[test]
    fn test_judge_never_downgrades() {
        let dep = make_dependency("lodash", "^3.0.0", None);
        let versions = list(&["1.0.0", "2.0.0"]);
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), None);
    }

    #[test]
    fn test_judge_excludes_prereleases_by_default() {
        let dep = make_dependency("next", "^13.0.0", None);
        let versions = list(&["14.1.0-canary.3", "14.0.0-rc.1", "13.5.6", "13.0.0"]);
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), Some(v("13.5.6")));
    }

    #[test]
    fn test_judge_tagged_prerelease() {
        let dep = make_dependency("pkg", "1.9.0", None);
        let versions = list(&["2.0.0-rc.2", "2.0.0-beta.3", "2.0.0-rc.1", "1.9.0"]);
        let policy = UpdatePolicy::new().with_prerelease(PrereleaseMode::Tagged("rc".to_string()));
        assert_eq!(decide(policy, &dep, &versions), Some(v("2.0.0-rc.2")));

        let policy = UpdatePolicy::new().with_prerelease(PrereleaseMode::Tagged("beta".to_string()));
        assert_eq!(decide(policy, &dep, &versions), Some(v("2.0.0-beta.3")));
    }

    #[test]
    fn test_judge_any_prerelease() {
        let dep = make_dependency("pkg", "1.9.0", None);
        let versions = list(&["2.0.0", "2.0.0-rc.2", "2.0.0-beta.3", "1.9.0"]);
        let policy = UpdatePolicy::new().with_prerelease(PrereleaseMode::Any);
        assert_eq!(decide(policy, &dep, &versions), Some(v("2.0.0-rc.2")));
    }

    #[test]
    fn test_judge_conservative_locks_major() {
        let dep = make_dependency("pkg", "^3.2.0", None);
        let versions = list(&["4.0.0", "3.5.0", "3.2.1"]);
        let policy = UpdatePolicy::new().with_conservative(true);
        assert_eq!(decide(policy, &dep, &versions), Some(v("3.5.0")));
    }

    #[test]
    fn test_judge_conservative_skips_prereleases() {
        let dep = make_dependency("pkg", "^3.2.0", None);
        let versions = list(&["3.6.0-rc.1", "3.5.0"]);
        let policy = UpdatePolicy::new()
            .with_conservative(true)
            .with_prerelease(PrereleaseMode::Any);
        assert_eq!(decide(policy, &dep, &versions), None);
    }

    #[test]
    fn test_judge_conservative_uses_installed_major() {
        let dep = make_dependency("pkg", "^3.0.0", Some("4.1.0"));
        let versions = list(&["5.0.0", "4.2.0", "3.9.0"]);
        let policy = UpdatePolicy::new().with_conservative(true);
        assert_eq!(decide(policy, &dep, &versions), Some(v("4.2.0")));
    }

    #[test]
    fn test_judge_filter_scoping() {
        let versions = list(&["9.0.0"]);
        let policy = UpdatePolicy::new().with_filter("lodash");
        let judge = UpdateJudge::new(policy);

        for (name, expected) in [("lodash", true), ("lodash.merge", true), ("react", false)] {
            let dep = make_dependency(name, "^1.0.0", None);
            assert_eq!(judge.decide_auto(&dep, &versions).is_some(), expected, "{name}");
        }
    }

    #[test]
    fn test_judge_build_metadata_is_not_an_update() {
        let dep = make_dependency("pkg", "^1.0.0", None);
        let versions = list(&["1.0.0+build.7", "0.9.0"]);
        assert_eq!(decide(UpdatePolicy::new(), &dep, &versions), None);

        let chosen = UpdateJudge::decide_interactive(&dep, &v("1.0.0+build.7"));
        assert_eq!(chosen, Choice::Keep);
    }

    #[test]
    fn test_eligible_versions_floor_inclusive() {
        let versions = list(&["2.0.0", "1.5.0", "1.0.0", "0.9.0"]);
        let eligible = eligible_versions(&versions, &v("1.0.0"), &UpdatePolicy::new());
        assert_eq!(eligible, vec![&v("2.0.0"), &v("1.5.0"), &v("1.0.0")]);
    }

    #[test]
    fn test_floor_property_over_mixed_lists() {
        let versions = list(&[
            "3.0.0", "3.0.0-rc.1", "2.5.0", "2.4.9", "2.4.9-beta.2", "2.0.0", "1.0.0",
        ]);
        let policies = [
            UpdatePolicy::new(),
            UpdatePolicy::new().with_conservative(true),
            UpdatePolicy::new().with_prerelease(PrereleaseMode::Any),
            UpdatePolicy::new().with_prerelease(PrereleaseMode::Tagged("beta".to_string())),
        ];

        for current in ["1.0.0", "2.0.0", "2.4.9", "2.5.0", "3.0.0", "3.1.0"] {
            let dep = make_dependency("pkg", current, None);
            for policy in &policies {
                if let Some(chosen) = decide(policy.clone(), &dep, &versions) {
                    assert!(chosen > v(current), "{chosen} <= {current} under {policy:?}");
                    if policy.prerelease == PrereleaseMode::None {
                        assert!(chosen.pre.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_decide_interactive() {
        let dep = make_dependency("react", "^17.0.0", Some("17.0.2"));
        assert_eq!(UpdateJudge::decide_interactive(&dep, &v("17.0.2")), Choice::Keep);

        match UpdateJudge::decide_interactive(&dep, &v("16.14.0")) {
            Choice::Update(decision) => assert_eq!(decision.new_version, v("16.14.0")),
            Choice::Keep => panic!("downgrade should be recorded"),
        }
    }
}
