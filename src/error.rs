//! Error types for kommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from running the `git` binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git was not found in PATH")]
    NotInstalled,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("git {operation} produced non-UTF-8 output")]
    InvalidOutput { operation: String },
}

/// Errors from loading or writing `.kommitrc.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[source] toml::de::Error),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Failed to write config {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not locate repository root: {0}")]
    RepositoryRoot(#[source] GitError),
}

/// Errors from the generation backend.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("KOMMIT_API_KEY or OPENAI_API_KEY environment variable must be set")]
    CredentialMissing,

    #[error("Generation request failed: {0}")]
    GenerationFailed(String),

    #[error("Generation returned malformed JSON: {source}")]
    MalformedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from creating the commit.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to prepare commit message file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("Failed to run git commit: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git commit exited with {}", code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    CommitFailed { code: Option<i32> },
}

/// Errors from interactive terminal prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Interactive prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Errors from the per-repository cost ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("No cost ledger at {0}")]
    NotFound(PathBuf),

    #[error("Could not determine a data directory for the cost ledger")]
    NoDataDir,

    #[error("Failed to read cost ledger {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cost ledger {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist cost ledger {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal errors of a `kommit` invocation.
#[derive(Error, Debug)]
pub enum KommitError {
    #[error("No staged changes")]
    NoStagedChanges,

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl KommitError {
    /// One-line message shown to the user regardless of verbosity.
    pub fn headline(&self) -> &'static str {
        match self {
            KommitError::NoStagedChanges => {
                "Commitment issues detected: You're not ready to commit... anything."
            }
            KommitError::Git(_) => "Commitment issues detected: git refused to talk to us.",
            KommitError::Config(ConfigError::UnsupportedModel(_)) => {
                "Commitment issues detected: The therapist's qualification looks sus!"
            }
            KommitError::Config(_) => {
                "Commitment issues detected: You haven't booked your first therapy session!"
            }
            KommitError::Llm(LlmError::CredentialMissing) => {
                "Commitment issues detected: Your therapist has no license key!"
            }
            KommitError::Llm(LlmError::MalformedResponse { .. }) => {
                "Commitment issues detected: Your therapist's notes are illegible!"
            }
            KommitError::Llm(LlmError::GenerationFailed(_)) => {
                "Commitment issues detected: Your code is experiencing emotional resistance!"
            }
            KommitError::Commit(CommitError::TempFile(_)) => {
                "Commitment issues detected: Refusing to prepare temporary paperwork!"
            }
            KommitError::Commit(_) => "Commitment issues detected: Refusing to commit!",
            KommitError::Ledger(LedgerError::NotFound(_)) => {
                "Financial abandonment detected: It hasn't committed any expenses yet."
            }
            KommitError::Ledger(_) => {
                "Financial abandonment detected: Failed to retrieve your expenses."
            }
            KommitError::Prompt(_) => {
                "Commitment issues detected: Your therapist can't hear your answer!"
            }
        }
    }

    /// Follow-up advice printed under the headline, when there is any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            KommitError::NoStagedChanges => Some("(Stage some changes first!)"),
            KommitError::Git(GitError::NotInstalled) => Some("(Install git and try again.)"),
            KommitError::Config(ConfigError::UnsupportedModel(_)) => {
                Some("(Check your .kommitrc.toml for supported models.)")
            }
            KommitError::Config(_) => Some("(Run 'kommit init' to get on the calendar.)"),
            KommitError::Llm(LlmError::CredentialMissing) => Some(
                "Set up your OpenAI API key with one of:\n  \
                 export OPENAI_API_KEY=\"sk-...\"\n  \
                 export KOMMIT_API_KEY=\"sk-...\"    # For a dedicated key",
            ),
            KommitError::Ledger(LedgerError::NotFound(_)) => {
                Some("(Have you run `kommit` yet?)")
            }
            KommitError::Prompt(_) => Some("(Run kommit from an interactive terminal.)"),
            _ => None,
        }
    }
}
