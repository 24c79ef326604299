//! Shared domain types for convo.
//!
//! This crate contains the core domain types used across the service:
//! conversation messages, LLM request/response shapes, service configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;
