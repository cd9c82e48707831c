//! `kommit init`: write a `.kommitrc.toml` for the current repository.
//!
//! The wizard asks for a model and the commit types, then suggests scopes by
//! showing the model the tracked files and the scopes already used in
//! history.

pub mod scopes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub use scopes::{Scopes, build_scope_prompt, merge_scopes, suggest_scopes};

use crate::config::{Config, DEFAULT_COMMIT_TYPES, config_path};
use crate::cost::CostRecorder;
use crate::error::PromptError;
use crate::git::{Git, project_files, scopes_from_history};
use crate::llm::OpenAiClient;
use crate::llm::pricing::supported_models;

/// Deepest directory level listed in the scope prompt.
pub const MAX_FILE_DEPTH: usize = 5;

/// Interactive choices the wizard needs. `None` means the user cancelled.
pub trait InitPrompter {
    fn select_model(&mut self, models: &[&'static str]) -> Result<Option<String>, PromptError>;

    fn select_types(
        &mut self,
        types: &[&'static str],
    ) -> Result<Option<Vec<String>>, PromptError>;

    fn analysis_started(&mut self) {}

    fn analysis_finished(&mut self) {}
}

#[derive(Debug)]
pub enum InitOutcome {
    AlreadyInitialized(PathBuf),
    Created { path: PathBuf, config: Config },
    Cancelled,
}

/// Run the wizard against the repository `git` points at.
pub async fn run_init(
    git: &Git,
    client: &OpenAiClient,
    prompter: &mut dyn InitPrompter,
    recorder: &dyn CostRecorder,
) -> Result<InitOutcome> {
    let path = config_path(git).context("Failed to locate your repository")?;
    if path.exists() {
        return Ok(InitOutcome::AlreadyInitialized(path));
    }

    client
        .ensure_credentials()
        .context("Failed to find your therapist's license")?;

    let models: Vec<&'static str> = supported_models().collect();
    let Some(model) = prompter
        .select_model(&models)
        .context("Failed to choose your therapist")?
    else {
        return Ok(InitOutcome::Cancelled);
    };
    let Some(types) = prompter
        .select_types(DEFAULT_COMMIT_TYPES)
        .context("Failed to choose your therapy plan")?
    else {
        return Ok(InitOutcome::Cancelled);
    };

    let mut config = Config::default();
    config.llm.model = model;
    if !types.is_empty() {
        config.commit.types = types;
    }

    prompter.analysis_started();
    let scopes = discover_scopes(git, client, config.model(), recorder).await;
    prompter.analysis_finished();
    config.commit.scopes = scopes?;

    config
        .write_to(&path)
        .context("Failed to write your treatment plan")?;

    Ok(InitOutcome::Created { path, config })
}

async fn discover_scopes(
    git: &Git,
    client: &OpenAiClient,
    model: &str,
    recorder: &dyn CostRecorder,
) -> Result<Vec<String>> {
    // A repository without commits has no history to read.
    let existing = scopes_from_history(git).unwrap_or_else(|e| {
        warn!("Could not read scopes from history: {e}");
        Vec::new()
    });

    let files = project_files(git, MAX_FILE_DEPTH)
        .context("Failed to retrieve your relationship history")?;
    debug!(
        "Suggesting scopes from {} files and {} existing scopes",
        files.len(),
        existing.len()
    );

    let completion = suggest_scopes(client, model, &files, &existing)
        .await
        .context("Failed to establish your treatment plan")?;
    recorder.record(completion.cost);

    Ok(merge_scopes(&existing, &completion.output.scopes))
}
