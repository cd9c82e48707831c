//! Thin wrapper around `std::process::Command` for running `git`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Check that a `git` executable is reachable through PATH.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git")
        .map(|_| ())
        .map_err(|_| GitError::NotInstalled)
}

/// Handle for running `git` in a given working directory.
///
/// With no working directory the current process directory is used, which is
/// how the binary runs; tests point it at a scratch repository instead.
#[derive(Debug, Clone, Default)]
pub struct Git {
    workdir: Option<PathBuf>,
}

impl Git {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(path.into()),
        }
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Build a `git` command rooted at the working directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run a git command, capturing stdout.
    ///
    /// `operation` names the command in error messages ("diff", "log", ...).
    pub fn run(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let stdout = self.run_raw(args, operation)?;
        String::from_utf8(stdout).map_err(|_| GitError::InvalidOutput {
            operation: operation.to_string(),
        })
    }

    /// Run a git command, returning stdout as raw bytes.
    pub fn run_raw(&self, args: &[&str], operation: &str) -> Result<Vec<u8>, GitError> {
        debug!("git {}", args.join(" "));

        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_git_version_succeeds() {
        let output = Git::new().run(&["--version"], "version").unwrap();
        assert!(output.starts_with("git version"));
    }

    #[test]
    fn test_run_git_invalid_command_fails() {
        let result = Git::new().run(&["not-a-real-command"], "invalid");
        assert!(matches!(
            result,
            Err(GitError::CommandFailed { ref operation, .. }) if operation == "invalid"
        ));
    }

    #[test]
    fn test_in_dir_sets_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::in_dir(dir.path());
        assert_eq!(git.workdir(), Some(dir.path()));
    }

    #[test]
    fn test_check_git_installed() {
        assert!(check_git_installed().is_ok());
    }
}
