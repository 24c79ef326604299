//! Infrastructure layer for convo.
//!
//! Contains implementations of the ports defined in `convo-core`: the Redis
//! key-value cache behind `CachingStore`, the OpenAI-compatible LLM provider,
//! and the TOML configuration loader.

pub mod cache;
pub mod config;
pub mod llm;
