//! Session inspection handlers.
//!
//! Endpoints:
//! - GET    /sessions/{id}/messages - Current bounded history, oldest first
//! - DELETE /sessions/{id}          - Clear the history (idempotent)

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use convo_types::message::Message;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionMessages {
    pub session_id: String,
    pub messages: Vec<Message>,
}

/// GET /sessions/{id}/messages - Return a session's history.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionMessages>, AppError> {
    let messages = state.service.history(&session_id).await?;
    Ok(Json(SessionMessages {
        session_id,
        messages,
    }))
}

/// DELETE /sessions/{id} - Reset a session to empty.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.clear(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
