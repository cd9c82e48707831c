//! Scope discovery from commit history and the project file list.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::GitError;

use super::runner::Git;

/// Directories never offered to the model as project structure.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "bin",
    "vendor",
    "target",
    ".git",
    ".github",
    ".vscode",
    ".idea",
    "coverage",
    "tmp",
    "temp",
];

/// Matches `type(scope):` and `type(scope)!:` subject prefixes.
static SCOPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+\(([\w-]+)\)!?:").expect("scope pattern is a valid regex")
});

/// Extract the distinct scopes used by conventional commit subjects, sorted.
pub fn parse_scopes<'a>(subjects: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    subjects
        .into_iter()
        .filter_map(|line| SCOPE_RE.captures(line.trim()))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Scopes already used in this repository's history.
pub fn scopes_from_history(git: &Git) -> Result<Vec<String>, GitError> {
    let output = git.run(&["log", "--pretty=format:%s"], "log")?;
    Ok(parse_scopes(output.lines()))
}

/// Keep paths at most `max_depth` components deep that avoid [`SKIP_DIRS`].
///
/// A `max_depth` of zero disables the depth limit.
pub fn filter_project_files<'a>(
    paths: impl IntoIterator<Item = &'a str>,
    max_depth: usize,
) -> Vec<String> {
    paths
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| {
            let parts: Vec<&str> = p.split('/').collect();
            if parts.iter().any(|part| SKIP_DIRS.contains(part)) {
                return false;
            }
            max_depth == 0 || parts.len() <= max_depth
        })
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tracked and untracked-but-not-ignored files, relative to the repository root.
pub fn project_files(git: &Git, max_depth: usize) -> Result<Vec<String>, GitError> {
    let output = git.run(
        &[
            "ls-files",
            "--cached",
            "--others",
            "--exclude-standard",
            "--full-name",
        ],
        "ls-files",
    )?;
    Ok(filter_project_files(output.lines(), max_depth))
}
