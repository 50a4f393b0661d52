//! Chat Relay
//!
//! Forwards a prompt to an OpenAI-compatible chat completion endpoint as a
//! single user message and hands back the first completion verbatim.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse};

#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn relay(&self, prompt: &str) -> Result<String, RelayError>;
}

/// OpenAI chat completions client
pub struct OpenAiRelay {
    base_url: String,
    api_key: String,
    model: String,
    http_client: reqwest::Client,
}

impl OpenAiRelay {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            http_client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatRelay for OpenAiRelay {
    async fn relay(&self, prompt: &str) -> Result<String, RelayError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Relaying prompt");

        let request = ChatCompletionRequest::user_prompt(&self.model, prompt);

        let response = self.http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion.first_reply().ok_or(RelayError::EmptyReply)
    }
}
