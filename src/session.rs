//! Interactive run loop
//!
//! The loop is a small state machine over [`Step`]. It starts at
//! `Select`, returns to the action prompt after every non-terminal step and
//! ends on `Update` (commit) or `Abort`.

use crate::domain::{Dependency, UpdateSet};
use crate::error::{PromptError, VersionQueryError};
use crate::output::{self, TextFormatter};
use crate::package_manager::VersionSource;
use crate::prompt::Prompter;
use crate::update::{Choice, UpdateJudge};
use log::debug;
use std::io::Write;

/// Steps of the interactive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Pick packages and versions
    Select,
    /// Show the selected updates
    Print,
    /// Flip auto-printing after each select round
    ToggleBatch,
    /// Commit the selected updates
    Update,
    /// Leave without writing anything
    Abort,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Update | Step::Abort)
    }
}

/// How an interactive session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The operator chose to update; the set may be empty
    Committed(UpdateSet),
    /// The operator aborted
    Aborted,
}

/// State owned by one interactive run
pub struct Session<'a> {
    dependencies: &'a [Dependency],
    source: &'a dyn VersionSource,
    prompter: &'a mut dyn Prompter,
    out: &'a mut dyn Write,
    formatter: TextFormatter,
    updates: UpdateSet,
    batch: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        dependencies: &'a [Dependency],
        source: &'a dyn VersionSource,
        prompter: &'a mut dyn Prompter,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            dependencies,
            source,
            prompter,
            out,
            formatter: TextFormatter::new(),
            updates: UpdateSet::new(),
            batch: true,
        }
    }

    pub fn with_formatter(mut self, formatter: TextFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Drive the loop until the operator updates or aborts
    pub async fn run(mut self) -> Result<SessionOutcome, PromptError> {
        let mut step = Step::Select;
        loop {
            debug!("session step {:?}", step);
            step = match step {
                Step::Select => {
                    self.select_round().await?;
                    if self.batch {
                        self.print()?;
                    }
                    self.prompter.next_step(self.batch)?
                }
                Step::Print => {
                    self.print()?;
                    self.prompter.next_step(self.batch)?
                }
                Step::ToggleBatch => {
                    self.batch = !self.batch;
                    let state = if self.batch { "on" } else { "off" };
                    writeln!(self.out, "{}", output::info(&format!("Batch mode {}", state)))?;
                    self.prompter.next_step(self.batch)?
                }
                Step::Update => return Ok(SessionOutcome::Committed(self.updates)),
                Step::Abort => return Ok(SessionOutcome::Aborted),
            };
        }
    }

    /// One selection round: pick packages, then a version for each
    ///
    /// A failed or empty version query is reported and only that package is
    /// left out of the round.
    pub async fn select_round(&mut self) -> Result<(), PromptError> {
        let dependencies = self.dependencies;
        let chosen = self.prompter.select_packages(dependencies, &self.updates)?;

        for dependency in chosen.into_iter().filter_map(|i| dependencies.get(i)) {
            let versions = match self.source.versions(&dependency.name).await {
                Ok(versions) if versions.is_empty() => {
                    let err = VersionQueryError::no_versions(&dependency.name);
                    writeln!(self.out, "{}", output::error_line(&err.to_string()))?;
                    continue;
                }
                Ok(versions) => versions,
                Err(err) => {
                    writeln!(self.out, "{}", output::error_line(&err.to_string()))?;
                    continue;
                }
            };

            let Some(picked) = self.prompter.select_version(dependency, &versions)? else {
                debug!("skipped {}", dependency.name);
                continue;
            };

            match UpdateJudge::decide_interactive(dependency, &picked) {
                Choice::Update(decision) => {
                    self.updates.insert(decision);
                }
                Choice::Keep => {
                    self.updates.remove(&dependency.name);
                    writeln!(
                        self.out,
                        "{}",
                        output::info(&format!("{} stays at {}", dependency.name, picked))
                    )?;
                }
            }
        }
        Ok(())
    }

    fn print(&mut self) -> Result<(), PromptError> {
        if self.updates.is_empty() {
            writeln!(self.out, "{}", output::info("No updates selected"))?;
        } else {
            self.formatter.format_updates(&self.updates, &mut *self.out)?;
        }
        Ok(())
    }
}
