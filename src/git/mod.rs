//! Git operations via the system `git` binary.
//!
//! Everything shells out so the user's own config, hooks, signing setup and
//! editor apply unchanged.

pub mod diff;
pub mod history;
pub mod repo;
pub mod runner;

pub use diff::DiffSource;
pub use history::{parse_scopes, project_files, scopes_from_history};
pub use repo::{current_repository_identity, repository_identity, toplevel};
pub use runner::{Git, check_git_installed};
