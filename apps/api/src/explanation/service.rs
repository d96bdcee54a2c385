//! Explanation Service: bridges the prompt builder to the text generator.
//!
//! Flow: validate → build prompt → generate (exactly once) → normalize.
//!
//! Every call mints its own conversation id, so concurrent or sequential
//! explanations can never share provider-side state. Dropping the returned
//! future drops the in-flight HTTP request with it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::explanation::models::{WordExplanation, WordExplanationRequest};
use crate::explanation::prompts::{build_prompt, EXPLAIN_WORD_SYSTEM};
use crate::llm_client::{GenerationCall, TextGenerator};

/// The three outcomes a caller can branch on besides success.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// `word` or `context` empty. Raised before any external call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The generator errored, timed out, or produced nothing usable.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

type PromptBuilder = fn(&WordExplanationRequest) -> Result<String, ExplainError>;

#[derive(Clone)]
pub struct ExplanationService {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ExplanationService {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn explain(
        &self,
        request: &WordExplanationRequest,
    ) -> Result<WordExplanation, ExplainError> {
        self.explain_with(request, build_prompt).await
    }

    async fn explain_with(
        &self,
        request: &WordExplanationRequest,
        builder: PromptBuilder,
    ) -> Result<WordExplanation, ExplainError> {
        let prompt = assemble_prompt(request, builder)?;
        let conversation_id = Uuid::new_v4();

        info!(
            "Explaining word '{}' (conversation {})",
            request.word, conversation_id
        );

        let raw = self
            .generator
            .generate(GenerationCall {
                system: EXPLAIN_WORD_SYSTEM,
                prompt: &prompt,
                conversation_id,
                timeout: self.timeout,
            })
            .await
            .map_err(|e| {
                warn!("Text generation failed for conversation {conversation_id}: {e}");
                ExplainError::GenerationFailed(e.to_string())
            })?;

        let explanation = raw.trim();
        if explanation.is_empty() {
            warn!("Text generation returned no text for conversation {conversation_id}");
            return Err(ExplainError::GenerationFailed(
                "the model returned an empty explanation".to_string(),
            ));
        }

        Ok(WordExplanation {
            word: request.word.clone(),
            context: request.context.clone(),
            explanation: explanation.to_string(),
        })
    }
}

/// Runs the builder, converting a panic into `Unexpected` so a defect in
/// prompt assembly fails one request instead of the worker.
fn assemble_prompt(
    request: &WordExplanationRequest,
    builder: PromptBuilder,
) -> Result<String, ExplainError> {
    panic::catch_unwind(AssertUnwindSafe(|| builder(request))).unwrap_or_else(|_| {
        Err(ExplainError::Unexpected(
            "prompt assembly panicked".to_string(),
        ))
    })
}
