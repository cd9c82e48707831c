//! Repository root and identity.

use std::path::{Path, PathBuf};

use crate::error::GitError;

use super::runner::Git;

/// Absolute path of the repository's top-level directory.
pub fn toplevel(git: &Git) -> Result<PathBuf, GitError> {
    let output = git.run(&["rev-parse", "--show-toplevel"], "rev-parse")?;
    Ok(PathBuf::from(output.trim()))
}

/// Identity string used as the cost ledger key for a repository root.
///
/// The root is canonicalized when possible and the home directory prefix is
/// abbreviated to `~`. The prefix match is per path component, so
/// `/home/al` never abbreviates `/home/alice`.
pub fn repository_identity(root: &Path, home: Option<&Path>) -> String {
    let canonical = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let home = home.map(|h| std::fs::canonicalize(h).unwrap_or_else(|_| h.to_path_buf()));

    if let Some(home) = home
        && let Ok(rest) = canonical.strip_prefix(&home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }

    canonical.display().to_string()
}

/// Identity of the repository containing the working directory.
pub fn current_repository_identity(git: &Git) -> Result<String, GitError> {
    let root = toplevel(git)?;
    Ok(repository_identity(&root, dirs::home_dir().as_deref()))
}
