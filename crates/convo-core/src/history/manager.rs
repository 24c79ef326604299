//! Session routing.
//!
//! `SessionHistoryManager` turns a session id into a [`SessionHistory`] handle
//! bound to the configured store. It holds no message data: with the memory
//! backend the session map lives inside `MemoryStore` (entries are created on
//! first lookup), and with the cache backend the cache is the only state.

use std::sync::Arc;

use convo_types::error::{ChatError, HistoryError};
use convo_types::message::Message;

use super::box_store::BoxHistoryStore;

/// Resolves session ids to history handles.
///
/// Cloning is cheap; all clones share the same store.
#[derive(Clone)]
pub struct SessionHistoryManager {
    store: Arc<BoxHistoryStore>,
}

impl SessionHistoryManager {
    pub fn new(store: BoxHistoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The store every handle routes to.
    pub fn store(&self) -> &BoxHistoryStore {
        &self.store
    }

    /// Get a handle for `session_id`.
    ///
    /// The id is opaque; the only check is that it is non-empty.
    pub fn resolve(&self, session_id: &str) -> Result<SessionHistory, ChatError> {
        if session_id.is_empty() {
            return Err(ChatError::InvalidSession);
        }
        Ok(SessionHistory {
            session_id: session_id.to_string(),
            store: Arc::clone(&self.store),
        })
    }
}

/// A history handle scoped to one session.
#[derive(Clone)]
pub struct SessionHistory {
    session_id: String,
    store: Arc<BoxHistoryStore>,
}

impl SessionHistory {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn messages(&self) -> Result<Vec<Message>, HistoryError> {
        self.store.get_messages(&self.session_id).await
    }

    pub async fn add_message(&self, message: Message) -> Result<(), HistoryError> {
        self.store.add_message(&self.session_id, message).await
    }

    pub async fn add_messages(&self, messages: Vec<Message>) -> Result<(), HistoryError> {
        self.store.add_messages(&self.session_id, messages).await
    }

    pub async fn clear(&self) -> Result<(), HistoryError> {
        self.store.clear(&self.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::caching::CachingStore;
    use crate::history::caching::tests::FakeCache;
    use crate::history::memory::MemoryStore;

    #[test]
    fn empty_session_id_is_rejected() {
        let manager = SessionHistoryManager::new(BoxHistoryStore::new(MemoryStore::new(4)));
        assert!(matches!(manager.resolve(""), Err(ChatError::InvalidSession)));
    }

    #[test]
    fn resolve_does_not_validate_format() {
        let manager = SessionHistoryManager::new(BoxHistoryStore::new(MemoryStore::new(4)));
        let handle = manager.resolve("telegram:12345/ä").unwrap();
        assert_eq!(handle.session_id(), "telegram:12345/ä");
    }

    #[tokio::test]
    async fn handles_for_same_session_share_history() {
        let manager = SessionHistoryManager::new(BoxHistoryStore::new(MemoryStore::new(4)));
        manager
            .resolve("s")
            .unwrap()
            .add_message(Message::user("hi"))
            .await
            .unwrap();

        let again = manager.resolve("s").unwrap();
        assert_eq!(again.messages().await.unwrap(), vec![Message::user("hi")]);
        assert!(manager.resolve("t").unwrap().messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn both_backends_behave_the_same() {
        let managers = [
            SessionHistoryManager::new(BoxHistoryStore::new(MemoryStore::new(3))),
            SessionHistoryManager::new(BoxHistoryStore::new(CachingStore::new(
                FakeCache::default(),
                3,
            ))),
        ];

        for manager in managers {
            let backend = manager.store().backend_name();
            let handle = manager.resolve("s").unwrap();
            for i in 0..5 {
                handle.add_message(Message::user(format!("m{i}"))).await.unwrap();
            }
            handle
                .add_messages(vec![Message::user("q"), Message::assistant("a")])
                .await
                .unwrap();

            let contents: Vec<String> = handle
                .messages()
                .await
                .unwrap()
                .into_iter()
                .map(|m| m.content)
                .collect();
            assert_eq!(contents, vec!["m4", "q", "a"], "backend {backend}");

            handle.clear().await.unwrap();
            assert!(handle.messages().await.unwrap().is_empty(), "backend {backend}");
            assert_eq!(manager.store().max_messages(), 3);
        }
    }
}
