//! Chat-completion client for the model API
//!
//! [`ChatClient`] is the seam the suggestion engine talks through;
//! implementors encapsulate transport and vendor-specific details.
//! [`OpenAiClient`] is the production implementation, constrained to
//! JSON-object responses so replies can be schema-validated downstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Result;
use crate::config::MenuAiConfig;
use crate::error::MenuAiError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends a system instruction plus a user prompt to a language model and
/// returns the assistant's reply text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat-completions implementation of [`ChatClient`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenAiClient {
    pub fn new(config: &MenuAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("MenuAI/0.1.0")
            .build()
            .map_err(|e| MenuAiError::upstream(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            http,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    #[instrument(skip_all)]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let res = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MenuAiError::upstream(format!("Failed to reach model API: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MenuAiError::upstream(format!(
                "Model request failed with status {status}: {body}"
            )));
        }

        let completion: ChatCompletion = res.json().await.map_err(|e| {
            MenuAiError::upstream(format!("Failed to parse model API response: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MenuAiError::upstream("Model response contained no completion"))?;

        debug!("Model reply: {} bytes", content.len());
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
