//! Terminal prompts for interactive mode
//!
//! Four prompt types are used by the run loop:
//! - multi-select of packages
//! - single-select of a target version (always offers "skip")
//! - single-select of the next action (always offers "abort")
//! - yes/no confirmation

use crate::domain::{Dependency, UpdateSet, VersionList};
use crate::error::PromptError;
use crate::output::TextFormatter;
use crate::session::Step;
use colored::Colorize;
use semver::Version;
use std::io::{self, BufRead, Write};

/// Number of newest versions listed in the version prompt
const VISIBLE_VERSIONS: usize = 15;

/// Operator interaction used by the run loop
pub trait Prompter {
    /// Pick dependencies to update; returns indices into `dependencies`
    fn select_packages(
        &mut self,
        dependencies: &[Dependency],
        updates: &UpdateSet,
    ) -> Result<Vec<usize>, PromptError>;

    /// Pick a target version; `None` means skip
    fn select_version(
        &mut self,
        dependency: &Dependency,
        versions: &VersionList,
    ) -> Result<Option<Version>, PromptError>;

    /// Pick the next step of the run loop
    fn next_step(&mut self, batch: bool) -> Result<Step, PromptError>;

    /// Ask a yes/no question, defaulting to no
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;
}

/// Prompter reading answers line by line
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
    formatter: TextFormatter,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            formatter: TextFormatter::new(),
        }
    }

    /// Use a specific formatter (e.g. without colours)
    pub fn with_formatter(mut self, formatter: TextFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Print `question` and read one trimmed line; `None` on end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        write!(self.writer, "{}", question.bold())?;
        self.writer.flush()?;

        let mut input = String::new();
        if self.reader.read_line(&mut input)? == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    fn complain(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.writer, "{}", message.red())?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select_packages(
        &mut self,
        dependencies: &[Dependency],
        updates: &UpdateSet,
    ) -> Result<Vec<usize>, PromptError> {
        writeln!(self.writer, "{}", "Select packages to update".bold())?;
        for (index, dependency) in dependencies.iter().enumerate() {
            let line = self.formatter.dependency_line(dependency);
            match updates.get(&dependency.name) {
                Some(decision) => writeln!(
                    self.writer,
                    "{:>4}) {} {}",
                    index + 1,
                    line,
                    format!("► {}", decision.new_version).cyan()
                )?,
                None => writeln!(self.writer, "{:>4}) {}", index + 1, line)?,
            }
        }

        loop {
            let Some(input) = self.ask("Packages (numbers, ranges like 2-5, names, 'all'; empty for none): ")?
            else {
                return Ok(Vec::new());
            };
            match parse_selection(&input, dependencies) {
                Ok(selection) => return Ok(selection),
                Err(message) => self.complain(&message)?,
            }
        }
    }

    fn select_version(
        &mut self,
        dependency: &Dependency,
        versions: &VersionList,
    ) -> Result<Option<Version>, PromptError> {
        let current = dependency.current_version();
        let default = match dependency.installed_version {
            Some(ref installed) if versions.contains(installed) => Some(installed.clone()),
            _ => versions.latest().cloned(),
        };

        writeln!(
            self.writer,
            "{} '{}' (current {})",
            "Select a new version for".bold(),
            dependency.name,
            current
        )?;
        for (index, version) in versions.iter().take(VISIBLE_VERSIONS).enumerate() {
            let label = version.to_string();
            let label = if version == current {
                format!("{} (current)", label).green().bold().to_string()
            } else if index == 0 {
                format!("{} (latest)", label).bold().to_string()
            } else {
                label
            };
            writeln!(self.writer, "{:>4}) {}", index + 1, label)?;
        }
        if versions.len() > VISIBLE_VERSIONS {
            writeln!(
                self.writer,
                "      {}",
                format!(
                    "... {} older versions; type a version to pick one not shown",
                    versions.len() - VISIBLE_VERSIONS
                )
                .dimmed()
            )?;
        }
        writeln!(self.writer, "{:>4}) {}", "s", "Skip".dimmed())?;

        let question = match default {
            Some(ref v) => format!("Version [Enter = {}]: ", v),
            None => "Version: ".to_string(),
        };

        loop {
            let Some(input) = self.ask(&question)? else {
                return Ok(None);
            };
            match parse_version_choice(&input, versions, default.as_ref()) {
                Ok(choice) => return Ok(choice),
                Err(message) => self.complain(&message)?,
            }
        }
    }

    fn next_step(&mut self, batch: bool) -> Result<Step, PromptError> {
        let batch_label = if batch {
            "Turn batch mode off"
        } else {
            "Turn batch mode on"
        };
        writeln!(self.writer, "{}", "What do you want to do next?".bold())?;
        writeln!(self.writer, "   1) {}", "Update packages".green())?;
        writeln!(self.writer, "   2) {}", "Select more packages".yellow())?;
        writeln!(self.writer, "   3) Print selected updates")?;
        writeln!(self.writer, "   4) {}", batch_label)?;
        writeln!(self.writer, "   5) {}", "Abort".dimmed())?;

        loop {
            let Some(input) = self.ask("Choice: ")? else {
                return Ok(Step::Abort);
            };
            match parse_step(&input) {
                Some(step) => return Ok(step),
                None => self.complain("Please answer with 1-5.")?,
            }
        }
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        let question = format!("{} [y/N]: ", message);
        loop {
            let Some(input) = self.ask(&question)? else {
                return Ok(false);
            };
            match input.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => self.complain("Please answer with y(es) or n(o).")?,
            }
        }
    }
}

/// Parse a package selection into indices, keeping input order
pub fn parse_selection(input: &str, dependencies: &[Dependency]) -> Result<Vec<usize>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input == "all" || input == "*" {
        return Ok((0..dependencies.len()).collect());
    }

    let mut selection = Vec::new();
    let mut push = |index: usize| {
        if !selection.contains(&index) {
            selection.push(index);
        }
    };
    let by_number = |token: &str| -> Option<usize> {
        let n: usize = token.parse().ok()?;
        (1..=dependencies.len()).contains(&n).then(|| n - 1)
    };

    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        if let Some(index) = dependencies.iter().position(|d| d.name == token) {
            push(index);
        } else if let Some(index) = by_number(token) {
            push(index);
        } else if let Some((start, end)) = token
            .split_once('-')
            .and_then(|(a, b)| Some((by_number(a)?, by_number(b)?)))
        {
            let (low, high) = if start <= end { (start, end) } else { (end, start) };
            (low..=high).for_each(&mut push);
        } else {
            return Err(format!("Unknown selection '{}'.", token));
        }
    }

    Ok(selection)
}

/// Parse an answer to the version prompt
fn parse_version_choice(
    input: &str,
    versions: &VersionList,
    default: Option<&Version>,
) -> Result<Option<Version>, String> {
    let input = input.trim();
    match input {
        "" => return default.cloned().map(Some).ok_or_else(|| "Please pick a version.".to_string()),
        "s" | "skip" => return Ok(None),
        _ => {}
    }

    if let Ok(n) = input.parse::<usize>() {
        let shown = versions.len().min(VISIBLE_VERSIONS);
        return if (1..=shown).contains(&n) {
            Ok(versions.as_slice().get(n - 1).cloned())
        } else {
            Err(format!("Please pick a number between 1 and {}.", shown))
        };
    }

    let typed = Version::parse(input.trim_start_matches('v'))
        .map_err(|_| format!("'{}' is not a version number.", input))?;
    if versions.contains(&typed) {
        Ok(Some(typed))
    } else {
        Err(format!("{} is not a published version.", typed))
    }
}

fn parse_step(input: &str) -> Option<Step> {
    match input.trim().to_lowercase().as_str() {
        "1" | "u" | "update" => Some(Step::Update),
        "2" | "s" | "select" => Some(Step::Select),
        "3" | "p" | "print" => Some(Step::Print),
        "4" | "b" | "batch" => Some(Step::ToggleBatch),
        "5" | "a" | "abort" | "q" | "quit" => Some(Step::Abort),
        _ => None,
    }
}
