//! Automatic update workflow
//!
//! This module provides:
//! - Parallel version queries bounded by a semaphore
//! - Policy-driven update judgment for every dependency that passes the filter
//! - Fail-fast on the first failed or empty query
//!
//! Queries complete in any order; decisions are merged in manifest order.

use crate::domain::{Dependency, UpdateSet, VersionList};
use crate::error::VersionQueryError;
use crate::package_manager::VersionSource;
use crate::progress::Progress;
use crate::update::{UpdatePolicy, UpdateJudge};
use log::debug;
use std::sync::Arc;
use std::thread;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Lower bound for concurrent version queries
const MIN_CONCURRENCY: usize = 4;

/// Concurrency limit for version queries: the host's parallelism, at least 4
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(MIN_CONCURRENCY)
}

/// Orchestrator for automatic mode
pub struct Orchestrator {
    /// Where version lists come from
    source: Arc<dyn VersionSource>,
    /// Policy-driven judgment
    judge: UpdateJudge,
    /// Maximum number of queries in flight
    concurrency: usize,
    /// Whether to draw a progress bar
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator with the default concurrency limit
    pub fn new(source: Arc<dyn VersionSource>, policy: UpdatePolicy) -> Self {
        Self {
            source,
            judge: UpdateJudge::new(policy),
            concurrency: default_concurrency(),
            show_progress: true,
        }
    }

    /// Override the concurrency limit (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Query every eligible dependency and decide its update
    ///
    /// Dependencies filtered out by the policy are never queried. The first
    /// failed or empty query cancels the outstanding ones and is returned.
    pub async fn run(&self, dependencies: &[Dependency]) -> Result<UpdateSet, VersionQueryError> {
        let candidates: Vec<(usize, &Dependency)> = dependencies
            .iter()
            .enumerate()
            .filter(|(_, dep)| self.judge.should_consider(dep))
            .collect();
        debug!(
            "querying {} of {} dependencies, {} at a time",
            candidates.len(),
            dependencies.len(),
            self.concurrency
        );

        let mut progress = Progress::new(self.show_progress);
        progress.start(candidates.len() as u64, "Checking dependencies");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        for (index, dep) in &candidates {
            let index = *index;
            let name = dep.name.clone();
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // The semaphore is never closed, so the permit is always granted
                let _permit = semaphore.acquire_owned().await.ok();
                let result = source.versions(&name).await;
                (index, name, result)
            });
        }

        let mut fetched: Vec<(usize, VersionList)> = Vec::with_capacity(candidates.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, name, result) = match joined {
                Ok(output) => output,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => continue,
            };
            progress.tick(&name);

            let versions = match result {
                Ok(versions) if versions.is_empty() => Err(VersionQueryError::no_versions(&name)),
                other => other,
            };
            match versions {
                Ok(versions) => fetched.push((index, versions)),
                Err(e) => {
                    tasks.abort_all();
                    progress.finish_and_clear();
                    return Err(e);
                }
            }
        }
        progress.finish_and_clear();

        fetched.sort_by_key(|(index, _)| *index);
        let mut updates = UpdateSet::new();
        for (index, versions) in &fetched {
            let dep = &dependencies[*index];
            match self.judge.decide_auto(dep, versions) {
                Some(decision) => {
                    debug!("{}", decision);
                    updates.insert(decision);
                }
                None => debug!("{} is up to date", dep.name),
            }
        }
        Ok(updates)
    }
}
