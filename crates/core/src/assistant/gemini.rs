//! Gemini `generateContent` client

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{resolve_api_key, Assistant, SessionDraft};
use crate::config::AssistantConfig;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_ENV_VAR: &str = "GEMINI_API_KEY";

pub struct GeminiAssistant {
    config: AssistantConfig,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAssistant")
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiAssistant {
    /// Fails when no API key can be found
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = resolve_api_key(config, DEFAULT_ENV_VAR)?;
        Ok(Self {
            config: config.clone(),
            api_key,
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self) -> String {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base_url.trim_end_matches('/'),
            self.config.model,
            self.api_key,
        )
    }

    /// POST one request and return the first candidate's text
    async fn generate(&self, body: serde_json::Value) -> Result<String> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Assistant(format!("Gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Assistant(format!("Gemini error {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::Assistant(format!("Gemini response parse error: {e}")))?;

        candidate_text(&json)
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    #[instrument(skip(self))]
    async fn draft_session(&self, topic: &str) -> Result<SessionDraft> {
        let body = draft_request(topic);
        let text = self.generate(body).await?;
        debug!(len = text.len(), "Draft received");
        parse_draft(&text)
    }

    #[instrument(skip(self))]
    async fn advise(&self, query: &str) -> Result<String> {
        let body = advice_request(query);
        self.generate(body).await
    }
}

fn draft_request(topic: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{"parts": [{"text": format!(
            "Suggest a compelling cybersecurity meetup title and short description for the topic: {topic}. Format it as JSON."
        )}]}],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "title": {"type": "STRING"},
                    "description": {"type": "STRING"},
                    "tags": {"type": "ARRAY", "items": {"type": "STRING"}}
                },
                "required": ["title", "description", "tags"]
            }
        }
    })
}

fn advice_request(query: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{"parts": [{"text": format!(
            "You are a cybersecurity expert assistant in a live meetup. Provide a concise technical answer to: {query}"
        )}]}],
        "generationConfig": {
            "thinkingConfig": {"thinkingBudget": 0}
        }
    })
}

fn candidate_text(json: &serde_json::Value) -> Result<String> {
    json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Assistant("Gemini response missing text".into()))
}

fn parse_draft(text: &str) -> Result<SessionDraft> {
    serde_json::from_str(text)
        .map_err(|e| Error::Assistant(format!("Gemini draft was not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant() -> GeminiAssistant {
        GeminiAssistant::from_config(&AssistantConfig {
            provider: "gemini".into(),
            model: "gemini-test".into(),
            api_key: Some("k123".into()),
            base_url: Some("http://127.0.0.1:1/".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            assistant().endpoint(),
            "http://127.0.0.1:1/v1beta/models/gemini-test:generateContent?key=k123"
        );
    }

    #[test]
    fn test_candidate_text() {
        let json = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Use a canary."}]}}]
        });
        assert_eq!(candidate_text(&json).unwrap(), "Use a canary.");

        let empty = serde_json::json!({"candidates": []});
        assert!(matches!(candidate_text(&empty), Err(Error::Assistant(_))));
    }

    #[test]
    fn test_parse_draft() {
        let draft = parse_draft(
            r#"{"title":"Heap Feng Shui","description":"Grooming allocators.","tags":["Binary","Exploit Dev"]}"#,
        )
        .unwrap();
        assert_eq!(draft.title, "Heap Feng Shui");
        assert_eq!(draft.tags.len(), 2);

        assert!(parse_draft("not json").is_err());
    }

    #[test]
    fn test_requests_carry_topic_and_schema() {
        let body = draft_request("eBPF rootkits");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("eBPF rootkits"));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let body = advice_request("What is ASLR?");
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .ends_with("What is ASLR?"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        let err = assistant().advise("anything").await.unwrap_err();
        assert!(matches!(err, Error::Assistant(_)));
    }
}
