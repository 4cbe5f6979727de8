//! Chat-completion provider used to solve and generate questions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::utils::error::{QbankError, QbankResult};

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat API request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Source of a single text response per request.
pub trait CompletionProvider {
    fn complete(&self, request: &CompletionRequest) -> QbankResult<String>;
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for &P {
    fn complete(&self, request: &CompletionRequest) -> QbankResult<String> {
        (**self).complete(request)
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    fn complete(&self, request: &CompletionRequest) -> QbankResult<String> {
        (**self).complete(request)
    }
}

/// Extract `choices[0].message.content` from a chat reply.
pub fn interpret_completion(status: u16, body: &str) -> QbankResult<String> {
    if !(200..300).contains(&status) {
        return Err(QbankError::completion(format!("HTTP {}: {}", status, body)));
    }
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| QbankError::completion(format!("malformed response: {}", e)))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| QbankError::completion("response contained no message content"))
}

/// OpenAI-compatible chat completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> QbankResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| QbankError::config("OPENAI_API_KEY is not set"))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QbankError::completion(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

impl CompletionProvider for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> QbankResult<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| QbankError::completion(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| QbankError::completion(e.to_string()))?;
        interpret_completion(status, &body)
    }
}
