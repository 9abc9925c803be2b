//! Update decisions and the accumulated update set

use super::Dependency;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The chosen new version for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDecision {
    /// The dependency being updated
    pub dependency: Dependency,
    /// The version to update to
    pub new_version: Version,
}

impl UpdateDecision {
    pub fn new(dependency: Dependency, new_version: Version) -> Self {
        Self {
            dependency,
            new_version,
        }
    }

    /// The range string that will be written to the manifest
    pub fn new_range(&self) -> String {
        self.dependency.range.format_updated(&self.new_version)
    }
}

impl fmt::Display for UpdateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.dependency.name,
            self.dependency.current_version(),
            self.new_version
        )
    }
}

/// Decisions keyed by dependency name
///
/// Re-deciding a name replaces the earlier decision in place, so iteration
/// follows the order in which names were first decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSet {
    decisions: Vec<UpdateDecision>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision, overwriting any earlier one for the same name
    pub fn insert(&mut self, decision: UpdateDecision) -> Option<UpdateDecision> {
        match self.position(&decision.dependency.name) {
            Some(index) => Some(std::mem::replace(&mut self.decisions[index], decision)),
            None => {
                self.decisions.push(decision);
                None
            }
        }
    }

    /// Drop the decision for `name`
    pub fn remove(&mut self, name: &str) -> Option<UpdateDecision> {
        self.position(name).map(|index| self.decisions.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&UpdateDecision> {
        self.position(name).map(|index| &self.decisions[index])
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpdateDecision> {
        self.decisions.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.decisions
            .iter()
            .position(|d| d.dependency.name == name)
    }
}

impl<'a> IntoIterator for &'a UpdateSet {
    type Item = &'a UpdateDecision;
    type IntoIter = std::slice::Iter<'a, UpdateDecision>;

    fn into_iter(self) -> Self::IntoIter {
        self.decisions.iter()
    }
}
