//! The commit pipeline: staged diff, prompt, generation, confirmation.

use tracing::debug;

use super::confirm::{ConfirmationLoop, Outcome, Presenter};
use super::executor::CommitExecutor;
use super::message::MessageGenerator;
use super::prompt::build_commit_prompt;
use crate::config::Config;
use crate::cost::CostRecorder;
use crate::error::KommitError;
use crate::git::DiffSource;

/// Collaborators the pipeline drives.
pub struct Collaborators<'a, D: ?Sized, G: ?Sized, P: ?Sized, E: ?Sized> {
    pub diff_source: &'a D,
    pub generator: &'a G,
    pub presenter: &'a mut P,
    pub executor: &'a E,
    pub recorder: &'a dyn CostRecorder,
}

/// Run one commit session against the staged changes.
///
/// Nothing is generated when the index is empty, and credentials are checked
/// before the prompt is built. The prompt is built once; regeneration reuses
/// it.
pub async fn run_commit_workflow<D, G, P, E>(
    config: &Config,
    collaborators: Collaborators<'_, D, G, P, E>,
) -> Result<Outcome, KommitError>
where
    D: DiffSource + ?Sized,
    G: MessageGenerator + ?Sized,
    P: Presenter + ?Sized,
    E: CommitExecutor + ?Sized,
{
    let Collaborators {
        diff_source,
        generator,
        presenter,
        executor,
        recorder,
    } = collaborators;

    let diff = diff_source.staged_diff()?;
    if diff.trim().is_empty() {
        return Err(KommitError::NoStagedChanges);
    }

    generator.ensure_ready()?;

    let prompt = build_commit_prompt(config, &diff);
    debug!(
        "Prompt: {} chars for a {} byte diff",
        prompt.len(),
        diff.len()
    );

    let mut session = ConfirmationLoop {
        generator,
        presenter,
        executor,
        recorder,
    };
    let first = session.generate(&prompt).await?;
    session.run(&prompt, first).await
}
