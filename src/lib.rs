//! nui - interactive package.json dependency updater library
//!
//! This library provides the core functionality for updating the
//! dependencies declared in a package.json:
//! - Locating the manifest and identifying its package manager
//! - Listing published versions through the package manager
//! - Choosing target versions interactively or by policy
//! - Rewriting version ranges in place and reinstalling

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod prompt;
pub mod session;
pub mod update;
