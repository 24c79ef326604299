//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        )
        .route("/sessions/{id}", delete(handlers::session::clear_session))
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use convo_core::history::{BoxHistoryStore, MemoryStore};
    use convo_core::llm::box_provider::BoxLlmProvider;
    use convo_core::llm::provider::LlmProvider;
    use convo_types::config::ServiceConfig;
    use convo_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    use crate::state::StoreHandle;

    enum Reply {
        Text(&'static str),
        Fail,
        Busy,
        Hang,
    }

    struct StubProvider(Reply);

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            match self.0 {
                Reply::Text(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.to_string(),
                    model: request.model.clone(),
                    usage: Usage::default(),
                }),
                Reply::Fail => Err(LlmError::AuthenticationFailed),
                Reply::Busy => Err(LlmError::RateLimited),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::Provider {
                        message: "unreachable".to_string(),
                    })
                }
            }
        }
    }

    fn app(reply: Reply) -> Router {
        let mut config = ServiceConfig::default();
        config.history.max_messages = 4;
        config.model.timeout_secs = 5;
        let memory = MemoryStore::new(config.history.max_messages);
        let store = StoreHandle {
            store: BoxHistoryStore::new(memory.clone()),
            memory: Some(memory),
        };
        build_router(AppState::new(
            config,
            store,
            BoxLlmProvider::new(StubProvider(reply)),
        ))
    }

    fn post_chat(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_answer_and_records_history() {
        let app = app(Reply::Text("hello"));

        let response = app
            .clone()
            .oneshot(post_chat(
                json!({"session_id": "s1", "message": "hi"}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"answer": "hello"}));

        let response = app.oneshot(get("/sessions/s1/messages")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "session_id": "s1",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"},
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_chat_missing_field_is_bad_request() {
        let response = app(Reply::Text("x"))
            .oneshot(post_chat(json!({"session_id": "s1"}).to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_chat_malformed_json_is_bad_request() {
        let response = app(Reply::Text("x"))
            .oneshot(post_chat("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_empty_values_are_bad_request() {
        let app = app(Reply::Text("x"));
        for body in [
            json!({"session_id": "", "message": "hi"}),
            json!({"session_id": "s1", "message": ""}),
        ] {
            let response = app.clone().oneshot(post_chat(body.to_string())).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway_and_history_untouched() {
        let app = app(Reply::Fail);
        let response = app
            .clone()
            .oneshot(post_chat(
                json!({"session_id": "s1", "message": "hi"}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["errors"][0]["code"], "MODEL_UNAVAILABLE");

        let response = app.oneshot(get("/sessions/s1/messages")).await.unwrap();
        assert_eq!(json_body(response).await["messages"], json!([]));
    }

    #[tokio::test]
    async fn test_rate_limited_model_is_service_unavailable() {
        let response = app(Reply::Busy)
            .oneshot(post_chat(
                json!({"session_id": "s1", "message": "hi"}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["errors"][0]["code"], "MODEL_BUSY");
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout_is_service_unavailable() {
        let response = app(Reply::Hang)
            .oneshot(post_chat(
                json!({"session_id": "s1", "message": "hi"}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["errors"][0]["code"], "MODEL_TIMEOUT");
    }

    #[tokio::test]
    async fn test_delete_session_clears_history() {
        let app = app(Reply::Text("hello"));
        app.clone()
            .oneshot(post_chat(
                json!({"session_id": "s1", "message": "hi"}).to_string(),
            ))
            .await
            .unwrap();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("DELETE")
                        .uri("/sessions/s1")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = app.oneshot(get("/sessions/s1/messages")).await.unwrap();
        assert_eq!(json_body(response).await["messages"], json!([]));
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let response = app(Reply::Text("x")).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["backend"], "memory");
        assert_eq!(body["max_messages"], 4);
    }
}
