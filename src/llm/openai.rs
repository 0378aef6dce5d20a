use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ AppError, Result };
use crate::providers::{ ChatRequest, ChatResponse, LlmProvider };

/// Client for any OpenAI-compatible chat-completions API (OpenAI, OpenRouter, ...).
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(model = %request.model, max_tokens = request.max_tokens, "Calling LLM");

        let response = self.client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send().await
            .map_err(|e| AppError::LlmCallFailed(format!("Failed to call LLM API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("LLM API error: {} - {}", status, error_text);
            return Err(
                AppError::LlmCallFailed(format!("LLM API returned error: {} - {}", status, error_text))
            );
        }

        response
            .json::<ChatResponse>().await
            .map_err(|e| AppError::LlmCallFailed(format!("Failed to parse LLM response: {}", e)))
    }
}
