//! The model collaborator.
//!
//! `ChatModel` turns a session's history plus the new user text into a
//! `CompletionRequest`, sends it through a `BoxLlmProvider`, and returns the
//! reply text. Every call runs inside a `gen_ai.chat` span.

use tracing::{Instrument, debug, info_span};

use convo_types::config::ModelConfig;
use convo_types::llm::{CompletionRequest, LlmError};
use convo_types::message::Message;

use crate::llm::box_provider::BoxLlmProvider;

/// Sampling settings fixed per deployment.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
}

impl From<&ModelConfig> for ModelSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            model: config.name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

/// Generates replies from history through an LLM provider.
pub struct ChatModel {
    provider: BoxLlmProvider,
    settings: ModelSettings,
}

impl ChatModel {
    pub fn new(provider: BoxLlmProvider, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Assemble the request: history in order, then the new user turn.
    pub fn build_request(&self, history: &[Message], input: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Message::user(input));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: self.settings.system_prompt.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        }
    }

    /// Produce the model's reply to `input` given the prior `history`.
    pub async fn generate(&self, history: &[Message], input: &str) -> Result<String, LlmError> {
        let request = self.build_request(history, input);

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            history_len = history.len(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Model replied"
        );
        Ok(response.content)
    }
}
