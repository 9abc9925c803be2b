//! package.json discovery, reading and rewriting
//!
//! This module provides functionality to:
//! - Locate the project manifest
//! - Parse dependency groups into Dependency records
//! - Resolve installed versions from node_modules
//! - Rewrite version ranges in place

mod detector;
pub mod installed;
pub mod json_edit;
mod package_json;
mod writer;

pub use detector::{find_manifest, MANIFEST_FILENAME};
pub use package_json::{
    declared_package_manager, parse_dependencies, read_dependencies, ManifestDependencies,
};
pub use writer::{apply_updates, write_updates};
