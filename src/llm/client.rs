//! Chat-completions client with plain-text and schema-constrained modes.

use std::env;
use std::time::Duration;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::auth::resolve_api_key;
use super::pricing::{Cost, Usage, estimate_cost, null_as_default};
use crate::error::LlmError;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable overriding the base URL.
pub const API_BASE_VAR: &str = "KOMMIT_API_BASE";

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const SYSTEM_PROMPT: &str = "You are an AI that generates Conventional Git commit messages.";

const STRUCTURED_SUFFIX: &str = "Return your response as a valid JSON object.";

/// Successful generation with the cost it incurred.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion<T> {
    pub output: T,
    pub usage: Usage,
    pub cost: Cost,
}

/// A named JSON schema the backend must constrain its reply to.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema {
    name: String,
    description: String,
    schema: Value,
    strict: bool,
}

impl ResponseSchema {
    /// Derive the schema from a Rust type.
    pub fn of<T: JsonSchema>(name: &str, description: &str) -> Self {
        let mut schema = schemars::schema_for!(T).to_value();
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
            strict: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: &'a ResponseSchema,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    choices: Vec<Choice>,
    #[serde(default, deserialize_with = "null_as_default")]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::from_env()
    }
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Client pointed at `KOMMIT_API_BASE`, or the public endpoint.
    pub fn from_env() -> Self {
        let base = env::var(API_BASE_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    /// Use a fixed key instead of resolving one from the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fail with `CredentialMissing` unless a key is configured or resolvable.
    pub fn ensure_credentials(&self) -> Result<(), LlmError> {
        self.api_key().map(|_| ())
    }

    fn api_key(&self) -> Result<String, LlmError> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => resolve_api_key(),
        }
    }

    /// Generate free text.
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<Completion<String>, LlmError> {
        let (content, usage) = self.request(prompt, model, None).await?;
        let cost = estimate_cost(model, &usage);
        Ok(Completion {
            output: content.trim().to_string(),
            usage,
            cost,
        })
    }

    /// Generate a JSON object constrained to `schema` and parse it as `T`.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        model: &str,
        schema: &ResponseSchema,
    ) -> Result<Completion<T>, LlmError> {
        let (content, usage) = self.request(prompt, model, Some(schema)).await?;
        let cost = estimate_cost(model, &usage);
        let output = serde_json::from_str(&content)
            .map_err(|source| LlmError::MalformedResponse { raw: content, source })?;
        Ok(Completion {
            output,
            usage,
            cost,
        })
    }

    async fn request(
        &self,
        prompt: &str,
        model: &str,
        schema: Option<&ResponseSchema>,
    ) -> Result<(String, Usage), LlmError> {
        let api_key = self.api_key()?;

        let system = match schema {
            Some(_) => format!("{SYSTEM_PROMPT} {STRUCTURED_SUFFIX}"),
            None => SYSTEM_PROMPT.to_string(),
        };
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            response_format: schema.map(|json_schema| ResponseFormat {
                kind: "json_schema",
                json_schema,
            }),
        };

        debug!(
            "Requesting completion from {model} ({} prompt chars, structured: {})",
            prompt.len(),
            schema.is_some()
        );

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::GenerationFailed(e.to_string()))?;

        let response = http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::GenerationFailed(format!(
                "{status}: {}",
                text.trim()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::GenerationFailed(format!("Unreadable response: {e}")))?;

        debug!(
            "Usage: {} prompt ({} cached), {} completion tokens",
            parsed.usage.prompt_tokens,
            parsed.usage.cached_tokens(),
            parsed.usage.completion_tokens
        );

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::GenerationFailed("Response contained no choices".into()))?;

        Ok((content, parsed.usage))
    }
}
