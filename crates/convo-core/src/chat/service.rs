//! Conversation service orchestrating one chat turn.
//!
//! `handle` loads the session's history, asks the model for a reply under a
//! timeout, then persists the user turn and the reply together. Nothing is
//! written unless the model answered, and dropping the future before that
//! point leaves the history untouched.

use std::time::Duration;

use tracing::{info, warn};

use convo_types::error::ChatError;
use convo_types::message::Message;

use crate::history::manager::SessionHistoryManager;

use super::model::ChatModel;

/// Orchestrates chat turns over a history manager and a model collaborator.
pub struct ConversationService {
    histories: SessionHistoryManager,
    model: ChatModel,
    model_timeout: Duration,
}

impl ConversationService {
    pub fn new(histories: SessionHistoryManager, model: ChatModel, model_timeout: Duration) -> Self {
        Self {
            histories,
            model,
            model_timeout,
        }
    }

    /// Access the history manager.
    pub fn histories(&self) -> &SessionHistoryManager {
        &self.histories
    }

    /// Access the model collaborator.
    pub fn model(&self) -> &ChatModel {
        &self.model
    }

    /// Run one chat turn and return the model's reply.
    #[tracing::instrument(
        name = "chat.handle",
        skip(self, user_text),
        fields(backend = self.histories.store().backend_name())
    )]
    pub async fn handle(&self, session_id: &str, user_text: &str) -> Result<String, ChatError> {
        if session_id.is_empty() {
            return Err(ChatError::InvalidRequest("session_id is required".to_string()));
        }
        if user_text.trim().is_empty() {
            return Err(ChatError::InvalidRequest("message is required".to_string()));
        }

        let history = self.histories.resolve(session_id)?;
        let prior = history.messages().await?;

        let reply = match tokio::time::timeout(
            self.model_timeout,
            self.model.generate(&prior, user_text),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(error = %e, provider = self.model.provider_name(), "Model call failed");
                if e.is_transient() {
                    return Err(ChatError::ModelBusy(e.to_string()));
                }
                return Err(ChatError::ModelUnavailable(e.to_string()));
            }
            Err(_) => {
                warn!(timeout = ?self.model_timeout, "Model call timed out");
                return Err(ChatError::ModelTimeout(self.model_timeout));
            }
        };

        history
            .add_messages(vec![Message::user(user_text), Message::assistant(reply.as_str())])
            .await?;

        info!(prior_messages = prior.len(), reply_len = reply.len(), "Chat turn completed");
        Ok(reply)
    }

    /// The current history of a session, oldest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, ChatError> {
        Ok(self.histories.resolve(session_id)?.messages().await?)
    }

    /// Reset a session to empty.
    pub async fn clear(&self, session_id: &str) -> Result<(), ChatError> {
        self.histories.resolve(session_id)?.clear().await?;
        info!(session_id, "Session history cleared");
        Ok(())
    }
}
