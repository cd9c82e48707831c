//! Scope suggestion from the project layout and commit history.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::LlmError;
use crate::llm::{Completion, OpenAiClient, ResponseSchema};

const SCHEMA_NAME: &str = "names";
const SCHEMA_DESCRIPTION: &str = "A list of module or package names.";

/// Scope names the model suggests for a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Scopes {
    pub scopes: Vec<String>,
}

/// Scope names that never make it into a config.
const REJECTED_SCOPES: &[&str] = &["build", "docs"];

/// Prompt asking the model to guess scope names.
pub fn build_scope_prompt(files: &[String], existing: &[String]) -> String {
    let mut prompt = String::from(
        "Based on the following project structure, guess module or package names \
         used in this project:\n",
    );
    for file in files {
        prompt.push_str(file);
        prompt.push('\n');
    }

    prompt.push_str("\nHere are some existing scopes:\n");
    for scope in existing {
        prompt.push_str(scope);
        prompt.push('\n');
    }

    prompt.push_str("\n- Do not suggest nested names\n");
    prompt.push_str("- Do not suggest names with \"/\"\n");
    prompt.push_str("- Do not suggest docs as a scope\n");
    prompt
}

/// Union of history scopes and suggestions, cleaned, sorted and deduplicated.
pub fn merge_scopes(existing: &[String], suggested: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing
        .iter()
        .chain(suggested)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| is_valid_scope(s))
        .collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

fn is_valid_scope(scope: &str) -> bool {
    !scope.is_empty()
        && !scope.contains('/')
        && !scope.chars().any(char::is_whitespace)
        && !REJECTED_SCOPES.contains(&scope)
}

/// Ask the model for scope names through the structured mode.
pub async fn suggest_scopes(
    client: &OpenAiClient,
    model: &str,
    files: &[String],
    existing: &[String],
) -> Result<Completion<Scopes>, LlmError> {
    let schema = ResponseSchema::of::<Scopes>(SCHEMA_NAME, SCHEMA_DESCRIPTION);
    let prompt = build_scope_prompt(files, existing);
    client.generate_structured(&prompt, model, &schema).await
}
