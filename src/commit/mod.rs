//! Commit message generation, confirmation and execution.

pub mod confirm;
pub mod executor;
pub mod message;
pub mod prompt;
pub mod workflow;

pub use confirm::{ConfirmationChoice, ConfirmationLoop, Outcome, Presenter};
pub use executor::CommitExecutor;
pub use message::{CommitMessageGenerator, GeneratedMessage, MessageGenerator, SIGNATURE};
pub use prompt::build_commit_prompt;
pub use workflow::{Collaborators, run_commit_workflow};
