//! Redis implementation of [`KeyValueCache`].
//!
//! Wraps a multiplexed `ConnectionManager`, which reconnects on its own after
//! a dropped connection. Cloning the manager is cheap and every command runs
//! on a clone, so one `RedisCache` is shared by all sessions.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use convo_core::storage::kv_cache::KeyValueCache;
use convo_types::error::HistoryError;

/// Shared Redis connection used as the history cache.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Open a connection to `url` (e.g. `redis://localhost:6379/0`).
    ///
    /// Fails if the URL is malformed or the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, HistoryError> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(map_redis_error)?;
        tracing::info!(url = %redacted(url), "Connected to Redis");
        Ok(Self { conn })
    }
}

impl KeyValueCache for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(map_redis_error)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), HistoryError> {
        // SET .. EX is a single command, so the value never exists without a TTL.
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), HistoryError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await.map_err(map_redis_error)?;
        Ok(())
    }
}

fn map_redis_error(err: redis::RedisError) -> HistoryError {
    HistoryError::Backend(format!("redis: {err}"))
}

/// Strip credentials from a connection URL before logging it.
fn redacted(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
