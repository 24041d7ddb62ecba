//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - OpenRouter (https://openrouter.ai/api/v1)
//! - OpenAI (https://api.openai.com/v1)
//! - vLLM, LocalAI, llama-server (http://localhost:8000/v1, ...)
//!
//! The configured base URL must include the API version prefix; requests go
//! to `{base_url}/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::models::{Suggestion, UpstreamData};
use crate::prompts::{suggestion_prompt, SYSTEM_PROMPT};

use super::parsing::parse_suggestion_reply;
use super::SuggestionBackend;

/// OpenAI-compatible chat-completion backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAICompatibleBackend {
    pub fn new(config: &ModelConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create with a shared HTTP client
    pub fn with_client(http_client: Client, config: &ModelConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }

    /// Make a chat completion request and return the first choice's content
    async fn chat_completion(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ModelCall(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ModelCall(format!(
                "Chat completion API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::ModelCall(format!("Unexpected response shape: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::ModelCall("No choices in chat completion response".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl SuggestionBackend for OpenAICompatibleBackend {
    async fn generate_suggestions(&self, data: &UpstreamData) -> Result<Vec<Suggestion>> {
        let prompt = suggestion_prompt(&data.expenses_by_day, &data.category_budgets);
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Requesting generated suggestions"
        );

        let content = self.chat_completion(SYSTEM_PROMPT, &prompt).await?;
        debug!("OpenAI-compatible response: {}", content);

        parse_suggestion_reply(&content)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
