//! HistoryStore trait definition.
//!
//! Every backend enforces the same bounded window: after any mutation
//! completes, a session holds at most `max_messages()` messages, the most
//! recent ones, in conversation order.

use convo_types::error::HistoryError;
use convo_types::message::Message;

/// Trait for bounded, per-session message logs.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Implementations
/// must be safe to share across concurrent requests for the same or different
/// sessions.
pub trait HistoryStore: Send + Sync {
    /// Short backend identifier for logs and health output (e.g., "memory").
    fn backend_name(&self) -> &'static str;

    /// The per-session window size.
    fn max_messages(&self) -> usize;

    /// Messages for a session, oldest first. Unknown sessions yield an empty list.
    fn get_messages(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, HistoryError>> + Send;

    /// Append one message, then drop from the front until the window holds.
    fn add_message(
        &self,
        session_id: &str,
        message: Message,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;

    /// Append several messages as a single mutation.
    ///
    /// The result equals calling `add_message` for each in order, but no other
    /// writer in this process can interleave between them.
    fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;

    /// Reset a session to empty. Clearing an unknown or empty session is a no-op.
    fn clear(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}
