//! Key-value cache trait.
//!
//! The minimal contract a networked history backend must offer: string
//! values under string keys, each written together with its expiry. Implementations live in
//! convo-infra.

use convo_types::error::HistoryError;

/// Trait for a shared key-value cache with per-key expiry.
///
/// One instance is shared by every session in the process and must be safe
/// for concurrent use. Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KeyValueCache: Send + Sync {
    /// Short backend label used in logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Get a value by key. Returns None if the key does not exist or expired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, HistoryError>> + Send;

    /// Set a value and (re)start its expiry at `ttl_secs` seconds.
    ///
    /// The value and its expiry land together: a failed or abandoned call
    /// never leaves the key written without a TTL.
    fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}
