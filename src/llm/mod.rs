//! Generation backend: credentials, pricing and the chat-completions client.

pub mod auth;
pub mod client;
pub mod pricing;

pub use auth::resolve_api_key;
pub use client::{Completion, OpenAiClient, ResponseSchema};
pub use pricing::{Cost, DEFAULT_MODEL, Usage, estimate_cost, is_supported_model};
