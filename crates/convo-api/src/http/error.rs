//! Application error type mapping to HTTP status codes and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use convo_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from a chat turn or a history operation.
    Chat(ChatError),
    /// Request body could not be read as the expected JSON shape.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e @ ChatError::InvalidRequest(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", e.to_string())
            }
            AppError::Chat(e @ ChatError::InvalidSession) => {
                (StatusCode::BAD_REQUEST, "INVALID_SESSION", e.to_string())
            }
            AppError::Chat(e @ ChatError::ModelUnavailable(_)) => {
                (StatusCode::BAD_GATEWAY, "MODEL_UNAVAILABLE", e.to_string())
            }
            AppError::Chat(e @ ChatError::ModelBusy(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_BUSY", e.to_string())
            }
            AppError::Chat(e @ ChatError::ModelTimeout(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_TIMEOUT", e.to_string())
            }
            AppError::Chat(e @ ChatError::CorruptHistory(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_HISTORY", e.to_string())
            }
            AppError::Chat(e @ ChatError::Storage(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", e.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        } else {
            tracing::debug!(code, %message, "Request rejected");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status_of(e: ChatError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn test_chat_errors_map_to_statuses() {
        assert_eq!(
            status_of(ChatError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ChatError::InvalidSession), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ChatError::ModelUnavailable("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ChatError::ModelBusy("rate limited".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ChatError::ModelTimeout(Duration::from_secs(60))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ChatError::CorruptHistory("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ChatError::Storage("refused".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
