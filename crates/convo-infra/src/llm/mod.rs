//! LLM provider implementations.

pub mod openai_compat;

use convo_core::llm::box_provider::BoxLlmProvider;
use convo_types::config::{ModelConfig, ModelProvider};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{gemini_defaults, openai_defaults};

/// Build the configured provider, boxed for dynamic dispatch.
///
/// `model.base_url`, when set, replaces the provider's default endpoint.
pub fn build_provider(model: &ModelConfig, api_key: &str) -> BoxLlmProvider {
    let mut config = match model.provider {
        ModelProvider::Gemini => gemini_defaults(api_key, &model.name),
        ModelProvider::OpenAi => openai_defaults(api_key, &model.name),
    };
    if let Some(ref base_url) = model.base_url {
        config.base_url = base_url.clone();
    }
    tracing::debug!(
        provider = %config.provider_name,
        model = %config.model,
        base_url = %config.base_url,
        "Building LLM provider"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_uses_configured_name() {
        let provider = build_provider(&ModelConfig::default(), "key");
        assert_eq!(provider.name(), "gemini");

        let model = ModelConfig {
            provider: ModelProvider::OpenAi,
            name: "gpt-4o-mini".to_string(),
            ..ModelConfig::default()
        };
        assert_eq!(build_provider(&model, "key").name(), "openai");
    }
}
