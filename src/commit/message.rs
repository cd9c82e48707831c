//! Generated commit messages and the generator seam.

use async_trait::async_trait;
use tracing::debug;

use crate::error::LlmError;
use crate::llm::{Cost, OpenAiClient};

/// Trailer appended to every generated message that reaches a commit.
pub const SIGNATURE: &str = "\n\n[Generated by Kommit]";

/// A commit message suggested by the model and what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMessage {
    pub text: String,
    pub cost: Cost,
}

impl GeneratedMessage {
    pub fn new(text: impl Into<String>, cost: Cost) -> Self {
        Self {
            text: text.into(),
            cost,
        }
    }

    /// The message as it is handed to git.
    pub fn signed(&self) -> String {
        format!("{}{SIGNATURE}", self.text)
    }
}

/// Source of commit messages for a prompt.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Check credentials before any prompt is built.
    fn ensure_ready(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedMessage, LlmError>;
}

/// Generator backed by the chat-completions client.
pub struct CommitMessageGenerator {
    client: OpenAiClient,
    model: String,
}

impl CommitMessageGenerator {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl MessageGenerator for CommitMessageGenerator {
    fn ensure_ready(&self) -> Result<(), LlmError> {
        self.client.ensure_credentials()
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedMessage, LlmError> {
        let completion = self.client.generate(prompt, &self.model).await?;
        debug!("Generated message costs ${:.5}", completion.cost);
        Ok(GeneratedMessage::new(completion.output, completion.cost))
    }
}
