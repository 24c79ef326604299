//! One chat turn: load history, ask the model, persist both turns.

pub mod model;
pub mod service;

pub use model::{ChatModel, ModelSettings};
pub use service::ConversationService;
