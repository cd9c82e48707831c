//! Static per-model rate table and cost estimation.

use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Estimated monetary cost in US dollars.
pub type Cost = f64;

/// Model written into new configs.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Price per token for each token class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub input: Cost,
    pub cached_input: Cost,
    pub output: Cost,
}

const PER_MILLION: Cost = 1e-6;

/// Supported models and their rates, from the public OpenAI price list.
pub const RATE_TABLE: &[(&str, Rates)] = &[
    (
        "gpt-4o-mini",
        Rates {
            input: 0.15 * PER_MILLION,
            cached_input: 0.075 * PER_MILLION,
            output: 0.60 * PER_MILLION,
        },
    ),
    (
        "gpt-4o",
        Rates {
            input: 2.50 * PER_MILLION,
            cached_input: 1.25 * PER_MILLION,
            output: 10.00 * PER_MILLION,
        },
    ),
    (
        "o3-mini",
        Rates {
            input: 1.10 * PER_MILLION,
            cached_input: 0.55 * PER_MILLION,
            output: 4.40 * PER_MILLION,
        },
    ),
];

/// Supported model identifiers, in rate-table order.
pub fn supported_models() -> impl Iterator<Item = &'static str> {
    RATE_TABLE.iter().map(|(model, _)| *model)
}

pub fn is_supported_model(model: &str) -> bool {
    rates_for(model).is_some()
}

pub fn rates_for(model: &str) -> Option<Rates> {
    RATE_TABLE
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, rates)| *rates)
}

/// Token usage counters as returned by the chat-completions API.
///
/// Missing and `null` counters both read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_tokens: u64,
    #[serde(default)]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptTokensDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cached_tokens: u64,
}

/// Deserialize a field that may be `null`, substituting its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Usage {
    pub fn cached_tokens(&self) -> u64 {
        self.prompt_tokens_details
            .as_ref()
            .map_or(0, |d| d.cached_tokens)
    }
}

/// Estimate the cost of one request.
///
/// Cached prompt tokens are billed once, at the cached rate. Unknown models
/// cost zero and emit a warning.
pub fn estimate_cost(model: &str, usage: &Usage) -> Cost {
    let Some(rates) = rates_for(model) else {
        warn!("No pricing for model '{model}', recording zero cost");
        return 0.0;
    };

    let cached = usage.cached_tokens().min(usage.prompt_tokens);
    let uncached = usage.prompt_tokens - cached;

    uncached as Cost * rates.input
        + cached as Cost * rates.cached_input
        + usage.completion_tokens as Cost * rates.output
}
