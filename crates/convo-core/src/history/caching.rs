//! History store backed by a networked key-value cache.
//!
//! `CachingStore` keeps no messages in-process: the cache is the only source
//! of truth. Each session lives under `{key_prefix}{session_id}` as the JSON
//! array produced by [`encode_history`], and every write restarts the key's
//! expiry at the configured TTL. A missing key is an empty history.
//!
//! Writes are a read-modify-write (GET, append, truncate, SET with expiry).
//! Within one process they are serialized per session by an async lock, so
//! local concurrent requests cannot lose each other's turns. The cache offers no
//! compare-and-swap, so two *processes* writing the same session can still
//! race and the later SET wins.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use convo_types::error::HistoryError;
use convo_types::message::Message;

use crate::storage::kv_cache::KeyValueCache;

use super::codec::{decode_history, encode_history};
use super::store::HistoryStore;
use super::window::append_windowed;

/// Default expiry applied on every write.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Bounded history store over any [`KeyValueCache`].
pub struct CachingStore<K: KeyValueCache> {
    cache: K,
    max_messages: usize,
    ttl_secs: u64,
    key_prefix: String,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<K: KeyValueCache> CachingStore<K> {
    /// Create a store with the default TTL and no key prefix.
    pub fn new(cache: K, max_messages: usize) -> Self {
        Self {
            cache,
            max_messages,
            ttl_secs: DEFAULT_TTL_SECS,
            key_prefix: String::new(),
            write_locks: DashMap::new(),
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Access the underlying cache.
    pub fn cache(&self) -> &K {
        &self.cache
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.key_prefix, session_id)
    }

    fn write_lease(&self, key: &str) -> WriteLease<'_> {
        let lock = self
            .write_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        WriteLease {
            locks: &self.write_locks,
            key: key.to_string(),
            lock,
        }
    }

    async fn load(&self, key: &str) -> Result<Vec<Message>, HistoryError> {
        match self.cache.get(key).await? {
            Some(raw) => decode_history(&raw).inspect_err(|e| {
                warn!(key, error = %e, "Stored history could not be decoded");
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, key: &str, messages: &[Message]) -> Result<(), HistoryError> {
        let raw = encode_history(messages)?;
        self.cache.set_with_ttl(key, &raw, self.ttl_secs).await
    }
}

/// A writer's claim on one session's lock.
///
/// Dropping the lease prunes the map entry once no other writer holds or
/// waits on it. Drop also runs when the owning future is cancelled, so an
/// abandoned write cannot strand its entry.
struct WriteLease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for WriteLease<'_> {
    fn drop(&mut self) {
        // Release our handle first so the last lease out sees a count of one.
        drop(std::mem::take(&mut self.lock));
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl<K: KeyValueCache> HistoryStore for CachingStore<K> {
    fn backend_name(&self) -> &'static str {
        self.cache.name()
    }

    fn max_messages(&self) -> usize {
        self.max_messages
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>, HistoryError> {
        self.load(&self.key(session_id)).await
    }

    async fn add_message(&self, session_id: &str, message: Message) -> Result<(), HistoryError> {
        self.add_messages(session_id, vec![message]).await
    }

    async fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), HistoryError> {
        let key = self.key(session_id);
        let lease = self.write_lease(&key);
        let _guard = lease.lock.lock().await;

        let mut history = self.load(&key).await?;
        let dropped = append_windowed(&mut history, messages, self.max_messages);
        self.store(&key, &history).await?;
        debug!(
            session_id,
            messages = history.len(),
            dropped,
            ttl_secs = self.ttl_secs,
            "Wrote cached history"
        );
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), HistoryError> {
        let key = self.key(session_id);
        let lease = self.write_lease(&key);
        let _guard = lease.lock.lock().await;
        self.cache.delete(&key).await
    }
}
