use std::sync::Arc;

use crate::corpus::store::RecordStore;
use crate::explanation::ExplanationService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Default: PgRecordStore.
    pub store: Arc<dyn RecordStore>,
    /// Word explanation pipeline over an `Arc<dyn TextGenerator>`.
    pub explainer: ExplanationService,
}
