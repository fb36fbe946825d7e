//! LLM provider routing and shared response handling.

pub mod json;
pub mod prompt;
pub mod retry;
pub mod router;

pub use json::extract_json;
pub use prompt::{sanitize_for_prompt, truncate_utf8};
pub use router::{
    available_providers, CliRunner, LlmCompletion, LlmError, LlmProviderError, LlmRouter,
    Provider, ProviderRunner, ProviderSelection,
};
