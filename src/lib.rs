//! kommit - A CLI tool that turns staged changes into conventional commit messages.
//!
//! # Overview
//!
//! kommit reads the staged diff, asks a chat-completions model for a
//! conventional commit message shaped by the repository's `.kommitrc.toml`,
//! and lets the user commit, edit, regenerate or walk away. The estimated
//! cost of every request is added to a per-repository ledger.

pub mod commit;
pub mod config;
pub mod cost;
pub mod error;
pub mod git;
pub mod init;
pub mod llm;
pub mod ui;

// Re-export commonly used types
pub use commit::{ConfirmationChoice, GeneratedMessage, Outcome};
pub use config::Config;
pub use error::{
    CommitError, ConfigError, GitError, KommitError, LedgerError, LlmError, PromptError,
};
