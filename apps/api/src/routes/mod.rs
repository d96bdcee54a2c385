pub mod health;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::corpus::handlers as corpus;
use crate::explanation::handlers as explanation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api", get(corpus::handle_root))
        .route("/api/", get(corpus::handle_root))
        // Corpus
        .route(
            "/api/poets",
            get(corpus::handle_list_poets).post(corpus::handle_create_poet),
        )
        .route("/api/poets/:id", get(corpus::handle_get_poet))
        .route(
            "/api/poems",
            get(corpus::handle_list_poems).post(corpus::handle_create_poem),
        )
        .route("/api/poems/:id", get(corpus::handle_get_poem))
        .route("/api/search", get(corpus::handle_search))
        .route("/api/init-data", post(corpus::handle_init_data))
        // Word explanation
        .route("/api/explain-word", post(explanation::handle_explain_word))
        .with_state(state)
}

/// `*` (or an empty list) allows any origin; otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
