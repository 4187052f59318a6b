use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::chat::prompts::GREETING;
use crate::chat::{ChatTurn, Transcript};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Every prior turn, oldest first.
    #[serde(default)]
    pub history: Transcript,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub turn: ChatTurn,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = state.chat.send(&body.history, &body.message).await?;
    Ok(Json(ChatResponse { reply }))
}

/// GET /api/v1/chat/greeting
pub async fn handle_greeting() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        turn: ChatTurn::assistant(GREETING),
    })
}
