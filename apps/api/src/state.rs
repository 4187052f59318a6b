use std::sync::Arc;

use crate::analysis::AnalysisClient;
use crate::chat::ChatAdapter;
use crate::store::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisClient,
    pub chat: ChatAdapter,
    /// Pluggable artifact store. Production: `PgResultStore`.
    pub store: Arc<dyn ResultStore>,
}
