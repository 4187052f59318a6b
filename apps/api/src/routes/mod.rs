pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::chat::handlers as chat;
use crate::extract::handlers as extract;
use crate::state::AppState;

/// Uploaded resumes rarely exceed a few hundred KB; PDFs with embedded fonts can.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Upload
        .route(
            "/api/v1/extract",
            post(extract::handle_extract).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        // Resumes
        .route("/api/v1/resumes", get(analysis::handle_list_resumes))
        .route("/api/v1/resumes/improve", post(analysis::handle_improve))
        .route("/api/v1/resumes/build", post(analysis::handle_build))
        .route(
            "/api/v1/builder/template",
            get(analysis::handle_builder_template),
        )
        .route("/api/v1/builder/demo", get(analysis::handle_builder_demo))
        // ATS
        .route("/api/v1/ats/check", post(analysis::handle_ats_check))
        // Assistant
        .route("/api/v1/chat", post(chat::handle_chat))
        .route("/api/v1/chat/greeting", get(chat::handle_greeting))
        .with_state(state)
}
