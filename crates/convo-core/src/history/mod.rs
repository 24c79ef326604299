//! Bounded, per-session conversation history.
//!
//! - `HistoryStore`: the contract both backends implement
//! - `MemoryStore`: process-local map of sessions
//! - `CachingStore`: sessions kept in a networked key-value cache with expiry
//! - `SessionHistoryManager`: resolves a session id to a history handle

pub mod box_store;
pub mod caching;
pub mod codec;
pub mod manager;
pub mod memory;
pub mod store;
pub mod window;

pub use box_store::BoxHistoryStore;
pub use caching::CachingStore;
pub use manager::{SessionHistory, SessionHistoryManager};
pub use memory::MemoryStore;
pub use store::HistoryStore;
