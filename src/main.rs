//! nui - interactive package.json dependency updater CLI tool
//!
//! Runs in one of two modes:
//! - interactive: pick packages and versions from menus
//! - auto: update every dependency under a policy, then confirm

use clap::Parser;
use log::debug;
use nui::cli::{CliArgs, Command};
use nui::domain::{Dependency, UpdateSet};
use nui::error::{AppError, ManifestError, PromptError};
use nui::manifest::{find_manifest, read_dependencies, write_updates, ManifestDependencies};
use nui::orchestrator::Orchestrator;
use nui::output::{self, TextFormatter};
use nui::package_manager::{self, CommandVersionSource, InstallRunner, PackageManager, SystemInstaller};
use nui::progress::Progress;
use nui::prompt::{Prompter, TerminalPrompter};
use nui::session::{Session, SessionOutcome};
use nui::update::UpdatePolicy;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{}", output::error_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// `warn` by default, `debug` for this crate with `--verbose`; `RUST_LOG` wins
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "nui=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    println!("{}", output::banner("nui", env!("CARGO_PKG_VERSION")));

    let Some(manifest_path) = find_manifest(args.config.as_deref(), &cwd) else {
        let searched = args.config.clone().unwrap_or_else(|| cwd.clone());
        return Err(AppError::from(ManifestError::not_found(searched)).into());
    };
    let project_dir = manifest_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    println!("{}", output::banner("pkg", &manifest_path.display().to_string()));

    let manager = match args.package_manager {
        Some(ref name) => PackageManager::from_name(name),
        None => package_manager::identify(&manifest_path),
    };
    println!("{}", output::banner("pkm", manager.command()));

    let ManifestDependencies {
        dependencies,
        rejected,
    } = read_dependencies(&manifest_path, &cwd)?;
    for err in &rejected {
        eprintln!("{}", output::warning_line(&format!("skipped: {}", err)));
    }
    debug!("{} dependencies in {}", dependencies.len(), manifest_path.display());

    let source = Arc::new(CommandVersionSource::new(manager.clone(), &project_dir));
    let updates = match args.command() {
        Command::Interactive => {
            println!("{}", output::banner("mode", "interactive"));
            interactive(&dependencies, source).await?
        }
        Command::Auto(auto) => {
            let policy = auto.policy();
            println!("{}", output::banner("mode", "auto"));
            println!("{}", output::banner("opt", &policy.describe()));
            automatic(&dependencies, source, policy, auto.yes).await?
        }
    };

    let Some(updates) = updates else {
        println!("{}", output::info("Aborting..."));
        return Ok(ExitCode::SUCCESS);
    };
    if updates.is_empty() {
        println!("{}", output::info("No updates selected"));
        return Ok(ExitCode::SUCCESS);
    }

    commit(&manifest_path, &updates, &manager, &project_dir)?;
    Ok(ExitCode::SUCCESS)
}

/// Run the interactive loop; `None` when the operator aborts
async fn interactive(
    dependencies: &[Dependency],
    source: Arc<CommandVersionSource>,
) -> Result<Option<UpdateSet>, AppError> {
    let mut prompter = TerminalPrompter::stdio();
    let mut stdout = io::stdout();
    let outcome = Session::new(dependencies, source.as_ref(), &mut prompter, &mut stdout)
        .run()
        .await?;

    Ok(match outcome {
        SessionOutcome::Committed(updates) => Some(updates),
        SessionOutcome::Aborted => None,
    })
}

/// Decide every update by policy and confirm unless `--yes`
async fn automatic(
    dependencies: &[Dependency],
    source: Arc<CommandVersionSource>,
    policy: UpdatePolicy,
    yes: bool,
) -> Result<Option<UpdateSet>, AppError> {
    let updates = Orchestrator::new(source, policy)
        .run(dependencies)
        .await?;
    if updates.is_empty() {
        return Ok(Some(updates));
    }

    let mut stdout = io::stdout().lock();
    TextFormatter::new()
        .format_updates(&updates, &mut stdout)
        .map_err(PromptError::from)?;
    stdout.flush().map_err(PromptError::from)?;
    drop(stdout);

    if !yes && !TerminalPrompter::stdio().confirm("Update package.json and install?")? {
        return Ok(None);
    }
    Ok(Some(updates))
}

/// Write the manifest, then reinstall
///
/// An install failure does not roll back the rewritten manifest.
fn commit(
    manifest_path: &Path,
    updates: &UpdateSet,
    manager: &PackageManager,
    project_dir: &Path,
) -> Result<(), AppError> {
    write_updates(manifest_path, updates)?;
    println!(
        "{}",
        output::info(&format!(
            "Updated {} dependencies in {}",
            updates.len(),
            manifest_path.display()
        ))
    );

    let mut progress = Progress::new(true);
    progress.spinner(&format!(
        "Running {} {}",
        manager.command(),
        manager.install_args().join(" ")
    ));
    let result = SystemInstaller::new().run_install(manager, project_dir);
    progress.finish_and_clear();

    let result = result.into_result()?;
    debug!("install output: {}", result.stdout.trim());
    println!("{}", output::info(&format!("Done: {}", result.command)));
    Ok(())
}
