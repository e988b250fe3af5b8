//! Text-generation collaborator
//!
//! Two black-box operations: drafting a session from a topic and answering
//! `/ai` questions in a room. Both are slow and may fail; callers log the
//! failure and carry on.

mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AssistantConfig;
use crate::error::{Error, Result};

pub use gemini::GeminiAssistant;

/// Suggested title, description and tags for a new session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Draft a session for `topic`
    async fn draft_session(&self, topic: &str) -> Result<SessionDraft>;

    /// Concise technical answer to `query`
    async fn advise(&self, query: &str) -> Result<String>;
}

/// Used when no provider is configured; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

#[async_trait]
impl Assistant for OfflineAssistant {
    async fn draft_session(&self, _topic: &str) -> Result<SessionDraft> {
        Err(Error::Assistant("no assistant provider configured".into()))
    }

    async fn advise(&self, _query: &str) -> Result<String> {
        Err(Error::Assistant("no assistant provider configured".into()))
    }
}

/// Build the configured assistant
pub fn from_config(config: &AssistantConfig) -> Result<Arc<dyn Assistant>> {
    match config.provider.as_str() {
        "gemini" => {
            info!(model = %config.model, "Using Gemini assistant");
            Ok(Arc::new(GeminiAssistant::from_config(config)?))
        }
        "offline" | "" => {
            info!("Assistant disabled");
            Ok(Arc::new(OfflineAssistant))
        }
        other => Err(Error::Config(format!(
            "unknown assistant provider: '{other}' (expected 'gemini' or 'offline')"
        ))),
    }
}

/// API key from config, a custom env var, or `GEMINI_API_KEY`
pub(crate) fn resolve_api_key(config: &AssistantConfig, default_env_var: &str) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    let env_var_name = config.env_var.as_deref().unwrap_or(default_env_var);

    std::env::var(env_var_name).map_err(|_| {
        Error::Config(format!(
            "{} assistant requires an API key (set assistant.api_key or {})",
            config.provider, env_var_name
        ))
    })
}
