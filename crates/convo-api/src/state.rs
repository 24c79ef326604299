//! Application state wiring the history store, model and service together.
//!
//! The backend is chosen once from `[history] backend`; everything above
//! `BoxHistoryStore` is backend-agnostic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use convo_core::chat::{ChatModel, ConversationService, ModelSettings};
use convo_core::history::{BoxHistoryStore, CachingStore, MemoryStore, SessionHistoryManager};
use convo_core::llm::box_provider::BoxLlmProvider;
use convo_infra::cache::RedisCache;
use convo_infra::llm::build_provider;
use convo_types::config::{HistoryBackend, HistoryConfig, ModelProvider, ServiceConfig};

/// The configured store plus a typed handle on the memory backend, if any.
pub struct StoreHandle {
    pub store: BoxHistoryStore,
    /// Shared view of the sessions when the memory backend is active; the
    /// idle sweeper runs against it.
    pub memory: Option<MemoryStore>,
}

/// Construct the history store selected by configuration.
///
/// The Redis backend connects eagerly so a bad URL fails at startup.
pub async fn build_store(config: &HistoryConfig) -> anyhow::Result<StoreHandle> {
    match config.backend {
        HistoryBackend::Memory => {
            let memory = MemoryStore::new(config.max_messages);
            Ok(StoreHandle {
                store: BoxHistoryStore::new(memory.clone()),
                memory: Some(memory),
            })
        }
        HistoryBackend::Redis => {
            let cache = RedisCache::connect(&config.redis.url)
                .await
                .context("failed to connect to the history cache")?;
            let store = CachingStore::new(cache, config.max_messages)
                .with_ttl_secs(config.redis.ttl_secs)
                .with_key_prefix(config.redis.key_prefix.clone());
            Ok(StoreHandle {
                store: BoxHistoryStore::new(store),
                memory: None,
            })
        }
    }
}

/// Resolve the model API key: an explicit value (flag or `CONVO_API_KEY`)
/// wins, otherwise the provider's conventional environment variable.
pub fn resolve_api_key(provider: ModelProvider, explicit: Option<String>) -> Option<String> {
    explicit.filter(|k| !k.is_empty()).or_else(|| {
        let var = match provider {
            ModelProvider::Gemini => "GEMINI_API_KEY",
            ModelProvider::OpenAi => "OPENAI_API_KEY",
        };
        std::env::var(var).ok().filter(|k| !k.is_empty())
    })
}

/// Shared application state used by the REST API and the CLI.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConversationService>,
    pub memory_store: Option<MemoryStore>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Wire state from an already-built store and provider.
    pub fn new(config: ServiceConfig, store: StoreHandle, provider: BoxLlmProvider) -> Self {
        let model = ChatModel::new(provider, ModelSettings::from(&config.model));
        let service = ConversationService::new(
            SessionHistoryManager::new(store.store),
            model,
            Duration::from_secs(config.model.timeout_secs),
        );
        Self {
            service: Arc::new(service),
            memory_store: store.memory,
            config: Arc::new(config),
        }
    }

    /// Initialize the application state: connect the store, build the provider.
    pub async fn init(config: ServiceConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let api_key = resolve_api_key(config.model.provider, api_key).with_context(|| {
            format!(
                "no API key for provider '{}': set CONVO_API_KEY or pass --api-key",
                config.model.provider
            )
        })?;

        let store = build_store(&config.history).await?;
        let provider = build_provider(&config.model, &api_key);

        tracing::info!(
            backend = %config.history.backend,
            max_messages = config.history.max_messages,
            provider = %config.model.provider,
            model = %config.model.name,
            "Application state initialized"
        );
        Ok(Self::new(config, store, provider))
    }

    /// Name of the active history backend.
    pub fn backend_name(&self) -> &'static str {
        self.service.histories().store().backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_api_key_wins() {
        let key = resolve_api_key(ModelProvider::Gemini, Some("explicit".to_string()));
        assert_eq!(key.as_deref(), Some("explicit"));
    }

    #[tokio::test]
    async fn test_memory_backend_exposes_shared_handle() {
        let handle = build_store(&HistoryConfig::default()).await.unwrap();
        assert_eq!(handle.store.backend_name(), "memory");
        assert_eq!(handle.store.max_messages(), 10);

        let memory = handle.memory.unwrap();
        handle
            .store
            .add_message("s", convo_types::message::Message::user("hi"))
            .await
            .unwrap();
        assert_eq!(memory.session_count(), 1);
    }

    #[tokio::test]
    async fn test_redis_backend_with_bad_url_fails() {
        let config = HistoryConfig {
            backend: HistoryBackend::Redis,
            redis: convo_types::config::RedisConfig {
                url: "not a redis url".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(build_store(&config).await.is_err());
    }
}
