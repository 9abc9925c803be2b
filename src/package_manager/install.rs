//! Install step run after the manifest is rewritten

use super::PackageManager;
use crate::error::InstallError;
use log::debug;
use std::path::Path;
use std::process::{Command, Output};

/// Result of a package manager installation
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl InstallResult {
    /// Create a successful install result
    pub fn success(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: true,
            stdout,
            stderr,
        }
    }

    /// Create a failed install result
    pub fn failure(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: false,
            stdout,
            stderr,
        }
    }

    /// Convert a failed result into an error
    pub fn into_result(self) -> Result<Self, InstallError> {
        if self.success {
            Ok(self)
        } else {
            Err(InstallError::Failed {
                command: self.command,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Trait for running package manager install commands
pub trait InstallRunner {
    /// Run the install command of `manager` in the specified directory
    fn run_install(&self, manager: &PackageManager, working_dir: &Path) -> InstallResult;
}

/// Default install runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemInstaller;

impl SystemInstaller {
    /// Create a new system installer
    pub fn new() -> Self {
        Self
    }

    /// Run a command and capture output
    fn run_command(&self, program: &str, args: &[&str], working_dir: &Path) -> std::io::Result<Output> {
        Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
    }
}

impl InstallRunner for SystemInstaller {
    fn run_install(&self, manager: &PackageManager, working_dir: &Path) -> InstallResult {
        let args = manager.install_args();
        let command_str = format!("{} {}", manager.command(), args.join(" "));
        debug!("running '{}' in {}", command_str, working_dir.display());

        match self.run_command(manager.command(), args, working_dir) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    InstallResult::success(command_str, stdout, stderr)
                } else {
                    InstallResult::failure(command_str, stdout, stderr)
                }
            }
            Err(e) => InstallResult::failure(
                command_str,
                String::new(),
                format!("Failed to execute command: {}", e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock install runner for testing
    struct MockInstaller {
        should_succeed: bool,
    }

    impl InstallRunner for MockInstaller {
        fn run_install(&self, manager: &PackageManager, _working_dir: &Path) -> InstallResult {
            let command = format!("{} install", manager);
            if self.should_succeed {
                InstallResult::success(command, "added 3 packages".to_string(), String::new())
            } else {
                InstallResult::failure(command, String::new(), "ERESOLVE".to_string())
            }
        }
    }

    #[test]
    fn test_install_result_success() {
        let result = InstallResult::success("npm install".to_string(), "done".to_string(), String::new());
        assert!(result.success);
        assert_eq!(result.command, "npm install");
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_install_result_failure_into_error() {
        let result = InstallResult::failure(
            "pnpm install".to_string(),
            String::new(),
            "  boom \n".to_string(),
        );
        let InstallError::Failed { command, stderr } = result.into_result().unwrap_err();
        assert_eq!(command, "pnpm install");
        assert_eq!(stderr, "boom");
    }

    #[test]
    fn test_mock_installer() {
        let ok = MockInstaller { should_succeed: true };
        assert!(ok.run_install(&PackageManager::Npm, Path::new(".")).success);

        let failing = MockInstaller { should_succeed: false };
        let result = failing.run_install(&PackageManager::Yarn, Path::new("."));
        assert!(!result.success);
        assert_eq!(result.command, "yarn install");
    }

    #[test]
    fn test_system_installer_missing_executable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = PackageManager::Other("nui-definitely-not-installed".to_string());
        let result = SystemInstaller::new().run_install(&manager, temp_dir.path());

        assert!(!result.success);
        assert!(result.command.starts_with("nui-definitely-not-installed install"));
        assert!(result.stderr.contains("Failed to execute command"));
    }
}
