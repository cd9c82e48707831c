//! API credential resolution.
//!
//! Lookup order:
//! 1. `KOMMIT_API_KEY` (dedicated key for this tool)
//! 2. `OPENAI_API_KEY`

use std::env;

use crate::error::LlmError;

/// Tool-specific credential variable, checked first.
pub const KOMMIT_API_KEY_VAR: &str = "KOMMIT_API_KEY";

/// Generic OpenAI credential variable.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Resolve the API key from the environment.
///
/// Empty values count as unset.
pub fn resolve_api_key() -> Result<String, LlmError> {
    [KOMMIT_API_KEY_VAR, OPENAI_API_KEY_VAR]
        .into_iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or(LlmError::CredentialMissing)
}
