//! Process-local history store.
//!
//! `MemoryStore` keeps every session in a `DashMap` keyed by session id. Each
//! entry sits behind its own async mutex, so the append-then-truncate step is
//! serialized per session while different sessions never contend. Entries
//! are created by the first append; reads and clears of an unknown session
//! leave the map alone. An entry lives until swept as idle or the process
//! exits.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use convo_types::error::HistoryError;
use convo_types::message::Message;

use super::store::HistoryStore;
use super::window::append_windowed;

#[derive(Debug)]
struct SessionEntry {
    messages: Vec<Message>,
    last_access: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            last_access: Instant::now(),
        }
    }
}

/// In-process, bounded history store.
///
/// Cloning produces a shared view of the same sessions (backed by `Arc`), which
/// lets the idle sweeper hold a handle alongside the boxed store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    sessions: Arc<DashMap<String, Arc<Mutex<SessionEntry>>>>,
    max_messages: usize,
}

impl MemoryStore {
    /// Create an empty store keeping at most `max_messages` per session.
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_messages,
        }
    }

    /// Look up a session's entry, inserting an empty one on a miss.
    ///
    /// The `Arc` is cloned out so no `DashMap` guard is held across `.await`.
    fn entry(&self, session_id: &str) -> Arc<Mutex<SessionEntry>> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionEntry::new())))
            .clone()
    }

    /// Look up an existing session's entry without creating one.
    fn existing(&self, session_id: &str) -> Option<Arc<Mutex<SessionEntry>>> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Remove sessions nobody has touched for longer than `max_idle`.
    ///
    /// Entries that another task currently holds are always kept, so a sweep
    /// can never detach a session out from under an in-flight append.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| {
            if Arc::strong_count(entry) > 1 {
                return true;
            }
            match entry.try_lock() {
                Ok(guard) => guard.last_access.elapsed() < max_idle,
                Err(_) => true,
            }
        });
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "Swept idle sessions");
        }
        removed
    }
}

impl HistoryStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn max_messages(&self) -> usize {
        self.max_messages
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>, HistoryError> {
        let Some(entry) = self.existing(session_id) else {
            return Ok(Vec::new());
        };
        let mut guard = entry.lock().await;
        guard.last_access = Instant::now();
        Ok(guard.messages.clone())
    }

    async fn add_message(&self, session_id: &str, message: Message) -> Result<(), HistoryError> {
        self.add_messages(session_id, vec![message]).await
    }

    async fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), HistoryError> {
        let entry = self.entry(session_id);
        let mut guard = entry.lock().await;
        let dropped = append_windowed(&mut guard.messages, messages, self.max_messages);
        guard.last_access = Instant::now();
        debug!(
            session_id,
            messages = guard.messages.len(),
            dropped,
            "Appended to in-memory history"
        );
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), HistoryError> {
        let Some(entry) = self.existing(session_id) else {
            return Ok(());
        };
        let mut guard = entry.lock().await;
        guard.messages.clear();
        guard.last_access = Instant::now();
        Ok(())
    }
}
