//! BoxHistoryStore -- object-safe dynamic dispatch wrapper for HistoryStore.
//!
//! Follows the same blanket-impl pattern as `BoxLlmProvider`, so the backend
//! is picked from configuration at startup rather than fixed at compile time.

use std::future::Future;
use std::pin::Pin;

use convo_types::error::HistoryError;
use convo_types::message::Message;

use super::store::HistoryStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HistoryError>> + Send + 'a>>;

/// Object-safe version of [`HistoryStore`] with boxed futures.
pub trait HistoryStoreDyn: Send + Sync {
    fn backend_name(&self) -> &'static str;

    fn max_messages(&self) -> usize;

    fn get_messages_boxed<'a>(&'a self, session_id: &'a str) -> BoxFuture<'a, Vec<Message>>;

    fn add_message_boxed<'a>(&'a self, session_id: &'a str, message: Message) -> BoxFuture<'a, ()>;

    fn add_messages_boxed<'a>(
        &'a self,
        session_id: &'a str,
        messages: Vec<Message>,
    ) -> BoxFuture<'a, ()>;

    fn clear_boxed<'a>(&'a self, session_id: &'a str) -> BoxFuture<'a, ()>;
}

/// Blanket implementation: any `HistoryStore` automatically implements `HistoryStoreDyn`.
impl<T: HistoryStore> HistoryStoreDyn for T {
    fn backend_name(&self) -> &'static str {
        HistoryStore::backend_name(self)
    }

    fn max_messages(&self) -> usize {
        HistoryStore::max_messages(self)
    }

    fn get_messages_boxed<'a>(&'a self, session_id: &'a str) -> BoxFuture<'a, Vec<Message>> {
        Box::pin(self.get_messages(session_id))
    }

    fn add_message_boxed<'a>(&'a self, session_id: &'a str, message: Message) -> BoxFuture<'a, ()> {
        Box::pin(self.add_message(session_id, message))
    }

    fn add_messages_boxed<'a>(
        &'a self,
        session_id: &'a str,
        messages: Vec<Message>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.add_messages(session_id, messages))
    }

    fn clear_boxed<'a>(&'a self, session_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(self.clear(session_id))
    }
}

/// Type-erased history store.
///
/// Since `HistoryStore` uses RPITIT, it cannot be used as a trait object directly.
/// `BoxHistoryStore` provides equivalent methods that delegate to the inner
/// `HistoryStoreDyn` trait object.
pub struct BoxHistoryStore {
    inner: Box<dyn HistoryStoreDyn + Send + Sync>,
}

impl BoxHistoryStore {
    /// Wrap a concrete `HistoryStore` in a type-erased box.
    pub fn new<T: HistoryStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    pub fn max_messages(&self) -> usize {
        self.inner.max_messages()
    }

    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>, HistoryError> {
        self.inner.get_messages_boxed(session_id).await
    }

    pub async fn add_message(&self, session_id: &str, message: Message) -> Result<(), HistoryError> {
        self.inner.add_message_boxed(session_id, message).await
    }

    pub async fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), HistoryError> {
        self.inner.add_messages_boxed(session_id, messages).await
    }

    pub async fn clear(&self, session_id: &str) -> Result<(), HistoryError> {
        self.inner.clear_boxed(session_id).await
    }
}
