//! Core domain models for nui
//!
//! This module contains the fundamental types used throughout the application:
//! - Declared version ranges split into prefix and version
//! - Dependency information structures
//! - Published version lists
//! - Update decisions and the accumulated update set

mod dependency;
mod update_result;
mod version_list;
mod version_range;

pub use dependency::{Dependency, DependencyKind};
pub use update_result::{UpdateDecision, UpdateSet};
pub use version_list::VersionList;
pub use version_range::VersionRange;
