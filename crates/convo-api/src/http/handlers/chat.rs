//! Chat turn handler.
//!
//! Endpoint:
//! - POST /chat - `{session_id, message}` in, `{answer}` out

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// POST /chat - Run one conversation turn for a session.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let start = Instant::now();
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "http.chat",
        %request_id,
        session_id = %request.session_id,
    );

    let answer = state
        .service
        .handle(&request.session_id, &request.message)
        .instrument(span)
        .await?;

    tracing::debug!(
        %request_id,
        response_time_ms = start.elapsed().as_millis() as u64,
        "Chat request served"
    );
    Ok(Json(ChatResponse { answer }))
}
