// Word Explanation: validate → build prompt → one text-generation call → normalize.
// All model calls go through llm_client::TextGenerator, never a provider directly.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;

pub use service::{ExplainError, ExplanationService};
