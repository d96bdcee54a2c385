//! Axum route handlers for the corpus API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::corpus::seed::{seed_sample_corpus, SeedOutcome};
use crate::errors::AppError;
use crate::models::poem::{Poem, PoemFilter};
use crate::models::poet::Poet;
use crate::state::AppState;

const LIST_LIMIT: i64 = 1000;
const SEARCH_POET_LIMIT: i64 = 10;
const SEARCH_POEM_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub poets: Vec<Poet>,
    pub poems: Vec<Poem>,
}

#[derive(Debug, Serialize)]
pub struct InitDataResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: SeedOutcome,
}

/// GET /api
pub async fn handle_root() -> Json<Value> {
    Json(json!({ "message": "مرحباً بك في منصة الشعر العربي" }))
}

/// GET /api/poets
pub async fn handle_list_poets(State(state): State<AppState>) -> Result<Json<Vec<Poet>>, AppError> {
    Ok(Json(state.store.list_poets(LIST_LIMIT).await?))
}

/// GET /api/poets/:id
pub async fn handle_get_poet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Poet>, AppError> {
    let poet = state
        .store
        .get_poet(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Poet {id} not found")))?;
    Ok(Json(poet))
}

/// POST /api/poets
pub async fn handle_create_poet(
    State(state): State<AppState>,
    Json(poet): Json<Poet>,
) -> Result<Json<Poet>, AppError> {
    poet.validate()?;
    state.store.insert_poet(&poet).await?;
    Ok(Json(poet))
}

/// GET /api/poems?poet_id=&theme=
pub async fn handle_list_poems(
    State(state): State<AppState>,
    Query(filter): Query<PoemFilter>,
) -> Result<Json<Vec<Poem>>, AppError> {
    Ok(Json(state.store.list_poems(&filter, LIST_LIMIT).await?))
}

/// GET /api/poems/:id
pub async fn handle_get_poem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Poem>, AppError> {
    let poem = state
        .store
        .get_poem(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Poem {id} not found")))?;
    Ok(Json(poem))
}

/// POST /api/poems
///
/// `poet_id` is stored as given; the poet does not have to exist.
pub async fn handle_create_poem(
    State(state): State<AppState>,
    Json(poem): Json<Poem>,
) -> Result<Json<Poem>, AppError> {
    poem.validate()?;
    state.store.insert_poem(&poem).await?;
    Ok(Json(poem))
}

/// GET /api/search?q=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let q = params.q.trim();
    if q.is_empty() {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }

    let poets = state.store.search_poets(q, SEARCH_POET_LIMIT).await?;
    let poems = state.store.search_poems(q, SEARCH_POEM_LIMIT).await?;

    Ok(Json(SearchResponse { poets, poems }))
}

/// POST /api/init-data
pub async fn handle_init_data(
    State(state): State<AppState>,
) -> Result<Json<InitDataResponse>, AppError> {
    let outcome = seed_sample_corpus(state.store.as_ref()).await?;
    let message = if outcome.seeded {
        "تم إنشاء البيانات التجريبية بنجاح"
    } else {
        "البيانات موجودة مسبقاً"
    };
    Ok(Json(InitDataResponse {
        message: message.to_string(),
        outcome,
    }))
}
