use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /health - Liveness probe reporting the active history backend.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "backend": state.backend_name(),
        "max_messages": state.config.history.max_messages,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
