//! The confirmation loop: present a suggestion, act on the user's choice.

use tracing::debug;

use super::executor::CommitExecutor;
use super::message::{GeneratedMessage, MessageGenerator};
use crate::cost::CostRecorder;
use crate::error::{KommitError, PromptError};

/// What the user decided to do with a presented message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Proceed,
    EditThenCommit,
    Regenerate,
    Abort,
}

impl ConfirmationChoice {
    /// All choices in menu order.
    pub const ALL: [ConfirmationChoice; 4] = [
        ConfirmationChoice::Proceed,
        ConfirmationChoice::EditThenCommit,
        ConfirmationChoice::Regenerate,
        ConfirmationChoice::Abort,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfirmationChoice::Proceed => "Yes, I'm ready to commit to this message (proceed)",
            ConfirmationChoice::EditThenCommit => "Yes, but I need to edit it first (edit)",
            ConfirmationChoice::Regenerate => {
                "No, I need another therapy session for a better message (re-run)"
            }
            ConfirmationChoice::Abort => "No, I'm terminating this therapy session (quit)",
        }
    }
}

/// How a commit invocation ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    CommittedWithEditor,
    Aborted,
    UserCancelled,
}

/// Terminal interaction needed by the loop.
///
/// `choose` returns `None` when the user cancels the selection (Ctrl-C,
/// Esc) rather than picking an option, and an error when the terminal
/// cannot be prompted at all.
pub trait Presenter {
    fn generation_started(&mut self) {}

    fn generation_finished(&mut self) {}

    fn present(&mut self, message: &GeneratedMessage);

    fn choose(&mut self) -> Result<Option<ConfirmationChoice>, PromptError>;

    /// Called right before `git commit` takes over the terminal.
    fn committing(&mut self, _choice: ConfirmationChoice) {}
}

/// Collaborators of one confirmation session.
pub struct ConfirmationLoop<'a, G: ?Sized, P: ?Sized, E: ?Sized> {
    pub generator: &'a G,
    pub presenter: &'a mut P,
    pub executor: &'a E,
    pub recorder: &'a dyn CostRecorder,
}

impl<G, P, E> ConfirmationLoop<'_, G, P, E>
where
    G: MessageGenerator + ?Sized,
    P: Presenter + ?Sized,
    E: CommitExecutor + ?Sized,
{
    /// Generate one message for `prompt` and record its cost.
    pub async fn generate(&mut self, prompt: &str) -> Result<GeneratedMessage, KommitError> {
        self.presenter.generation_started();
        let result = self.generator.generate(prompt).await;
        self.presenter.generation_finished();

        let message = result?;
        self.recorder.record(message.cost);
        Ok(message)
    }

    /// Present `message` until the user commits, aborts or cancels.
    ///
    /// Regenerate reuses `prompt` as is; the diff is not fetched again.
    pub async fn run(
        &mut self,
        prompt: &str,
        mut message: GeneratedMessage,
    ) -> Result<Outcome, KommitError> {
        loop {
            self.presenter.present(&message);

            let Some(choice) = self.presenter.choose()? else {
                return Ok(Outcome::UserCancelled);
            };
            debug!("User chose {choice:?}");

            match choice {
                ConfirmationChoice::Proceed => {
                    self.presenter.committing(choice);
                    self.executor.commit_direct(&message.signed())?;
                    return Ok(Outcome::Committed);
                }
                ConfirmationChoice::EditThenCommit => {
                    self.presenter.committing(choice);
                    self.executor.commit_with_editor(&message.signed())?;
                    return Ok(Outcome::CommittedWithEditor);
                }
                ConfirmationChoice::Regenerate => {
                    message = self.generate(prompt).await?;
                }
                ConfirmationChoice::Abort => return Ok(Outcome::Aborted),
            }
        }
    }
}
