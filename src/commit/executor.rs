//! Creating the commit.
//!
//! The message is staged in a temporary file and handed to `git commit`,
//! which inherits the terminal so signing passphrase prompts and the user's
//! editor work unmodified. The file is removed when the guard drops, on
//! success and failure alike.

use std::io::Write;
use std::process::ExitStatus;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CommitError;
use crate::git::Git;

const TEMP_PREFIX: &str = ".kommit-msg-";
const TEMP_SUFFIX: &str = ".txt";

/// Performs the version-control commit for a finished message.
#[cfg_attr(test, mockall::automock)]
pub trait CommitExecutor {
    /// Commit with `message` as the complete commit message.
    fn commit_direct(&self, message: &str) -> Result<(), CommitError>;

    /// Open the user's editor pre-seeded with `message`; an emptied message
    /// is allowed.
    fn commit_with_editor(&self, message: &str) -> Result<(), CommitError>;
}

impl CommitExecutor for Git {
    fn commit_direct(&self, message: &str) -> Result<(), CommitError> {
        let file = message_file(message)?;
        let status = self
            .command()
            .args(["commit", "-q", "-F"])
            .arg(file.path())
            .status()
            .map_err(CommitError::SpawnFailed)?;
        check_status(status)
    }

    fn commit_with_editor(&self, message: &str) -> Result<(), CommitError> {
        let file = message_file(message)?;
        let status = self
            .command()
            .args(["commit", "--template"])
            .arg(file.path())
            .arg("--allow-empty-message")
            .status()
            .map_err(CommitError::SpawnFailed)?;
        check_status(status)
    }
}

/// Write `message` to a uniquely named temp file that deletes itself on drop.
fn message_file(message: &str) -> Result<NamedTempFile, CommitError> {
    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile()
        .map_err(CommitError::TempFile)?;
    file.write_all(message.as_bytes())
        .and_then(|()| file.flush())
        .map_err(CommitError::TempFile)?;
    debug!("Staged commit message in {}", file.path().display());
    Ok(file)
}

fn check_status(status: ExitStatus) -> Result<(), CommitError> {
    if status.success() {
        Ok(())
    } else {
        Err(CommitError::CommitFailed {
            code: status.code(),
        })
    }
}
