//! Published version lists

use semver::Version;

/// Published versions of one package, newest first and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionList(Vec<Version>);

impl VersionList {
    /// Build a list from versions in any order
    pub fn new(mut versions: Vec<Version>) -> Self {
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        Self(versions)
    }

    /// Versions, newest first
    pub fn as_slice(&self) -> &[Version] {
        &self.0
    }

    /// The newest published version
    pub fn latest(&self) -> Option<&Version> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Version> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.0.contains(version)
    }
}

impl FromIterator<Version> for VersionList {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VersionList {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
