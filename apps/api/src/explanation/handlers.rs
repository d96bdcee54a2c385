use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::explanation::models::{WordExplanation, WordExplanationRequest};
use crate::explanation::ExplainError;
use crate::state::AppState;

/// POST /api/explain-word
///
/// 400 for an empty or malformed word/context, 500 with `GENERATION_FAILED`
/// when the model call fails.
pub async fn handle_explain_word(
    State(state): State<AppState>,
    payload: Result<Json<WordExplanationRequest>, JsonRejection>,
) -> Result<Json<WordExplanation>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| ExplainError::InvalidRequest(rejection.body_text()))?;
    let explanation = state.explainer.explain(&request).await?;
    Ok(Json(explanation))
}
