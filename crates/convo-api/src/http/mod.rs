//! HTTP/REST API layer for convo.
//!
//! Axum-based API: `POST /chat` plus session inspection and a health probe,
//! with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
