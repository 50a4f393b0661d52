//! Chat relay model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

pub const PROMPT_REQUIRED: &str = "Prompt is required";

#[derive(Debug, Deserialize, Validate)]
pub struct GptRequest {
    #[validate(required, length(min = 1))]
    pub prompt: Option<String>,
}

impl GptRequest {
    pub fn into_prompt(self) -> Result<String, AppError> {
        self.validate()
            .map_err(|_| AppError::ValidationError(PROMPT_REQUIRED.to_string()))?;
        self.prompt
            .ok_or_else(|| AppError::ValidationError(PROMPT_REQUIRED.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GptResponse {
    pub reply: String,
}

// OpenAI-compatible chat completion wire types

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Single user-role message, no history
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first completion
    pub fn first_reply(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
