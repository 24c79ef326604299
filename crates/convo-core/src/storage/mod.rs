//! Storage abstractions for convo.
//!
//! Defines the key-value-with-TTL port the networked history store talks to.
//! Implementations live in convo-infra.

pub mod kv_cache;
