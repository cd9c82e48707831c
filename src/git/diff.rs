//! Staged diff extraction.

use crate::error::GitError;

use super::runner::Git;

/// Source of the staged change set.
///
/// An empty string means nothing is staged.
pub trait DiffSource {
    fn staged_diff(&self) -> Result<String, GitError>;
}

impl DiffSource for Git {
    /// Staged files in other encodings are kept with invalid bytes replaced.
    fn staged_diff(&self) -> Result<String, GitError> {
        let stdout = self.run_raw(
            &["diff", "--cached", "--no-color", "--no-ext-diff"],
            "diff",
        )?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
