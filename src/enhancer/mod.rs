//! Outbound adapter for the prompt-rewriting service.
//! One request per call, no caller-side retry; failures map to typed
//! variants so the caller can keep the composed prompt on its own.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default chat-completions endpoint (OpenAI-compatible).
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen-qwq-32b";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TOP_P: f32 = 0.75;

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Reasoning side-channel some models emit before the answer. Stripped,
/// content included, before the response is treated as the enhanced prompt.
const THINK_BLOCK_PATTERN: &str = r"(?s)<think>.*?</think>";

/// The fixed "prompt expert" role given to the rewriting model.
const SYSTEM_INSTRUCTION: &str = r#"Promise:
"As a prompt expert, I will analyze the provided prompt and enhance it to maximize its effectiveness and clarity."
Goal:
"The goal is to refine the user's prompt so that the output from the language model is more accurate, clear, and actionable."
Output Format:
"Output should be a revised version of the original prompt, written clearly and concisely with actionable instructions for better model responses."
Warnings:
"Ensure that the revised prompt does not lose its original intent. Do not complicate the prompt unnecessarily. Keep the focus on improving clarity and specificity."
Context Dump:
"User will submit a prompt for you to refine. Your task is to improve this prompt so that the language model provides responses that are more aligned with user expectations.""#;

#[derive(Error, Debug)]
pub enum EnhancerError {
    #[error("Missing required environment variables: {0}")]
    MissingEnvironment(String),
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
    #[error("Invalid response filter pattern: {0}")]
    InvalidPattern(String),
    #[error("Request timeout - the API took too long to respond")]
    Timeout,
    #[error("Connection error - unable to reach the API")]
    Connection,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication failed - check your API key")]
    AuthFailed,
    #[error("Access forbidden - insufficient permissions")]
    Forbidden,
    #[error("Rate limit exceeded - too many requests")]
    RateLimited,
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to parse API response as JSON: {0}")]
    MalformedResponse(String),
    #[error("API returned empty response")]
    EmptyResponse,
    #[error("API returned empty content")]
    EmptyContent,
}

/// Credentials and decoding settings for the rewriting service. Constructed
/// per adapter, injected explicitly; never a process-wide singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancerConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl EnhancerConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Reads `API_KEY` (required), `API_URL` and `MODEL` (defaulted) from
    /// the environment, loading a `.env` file when one is present.
    pub fn from_env() -> Result<Self, EnhancerError> {
        dotenv::dotenv().ok();

        let api_key = std::env::var("API_KEY")
            .map_err(|_| EnhancerError::MissingEnvironment("API_KEY".to_string()))?;
        let api_url =
            std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_url, api_key, model))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Seam for the rewriting collaborator, so the pipeline can run against a
/// stub in tests and against HTTP in production.
#[async_trait]
pub trait Enhance: Send + Sync {
    async fn enhance(&self, prompt: &str) -> Result<String, EnhancerError>;
}

pub struct HttpEnhancer {
    client: Client,
    config: EnhancerConfig,
    think_blocks: Regex,
}

impl HttpEnhancer {
    pub fn new(config: EnhancerConfig) -> Result<Self, EnhancerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| EnhancerError::ClientBuild(e.to_string()))?;

        let think_blocks = Regex::new(THINK_BLOCK_PATTERN)
            .map_err(|e| EnhancerError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            client,
            config,
            think_blocks,
        })
    }

    pub fn from_env() -> Result<Self, EnhancerError> {
        Self::new(EnhancerConfig::from_env()?)
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: Some(self.config.temperature),
            top_p: Some(self.config.top_p),
        }
    }

    fn strip_think_blocks(&self, raw: &str) -> String {
        self.think_blocks.replace_all(raw, "").trim().to_string()
    }
}

#[async_trait]
impl Enhance for HttpEnhancer {
    async fn enhance(&self, prompt: &str) -> Result<String, EnhancerError> {
        let request_body = self.build_request(prompt);

        debug!(
            model = %self.config.model,
            prompt_length = prompt.len(),
            "Sending enhancement request"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnhancerError::Timeout
                } else if e.is_connect() {
                    EnhancerError::Connection
                } else {
                    EnhancerError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Enhancement request rejected");
            return Err(match status.as_u16() {
                401 => EnhancerError::AuthFailed,
                403 => EnhancerError::Forbidden,
                429 => EnhancerError::RateLimited,
                s @ 500..=599 => EnhancerError::Server { status: s, body },
                s => EnhancerError::Http { status: s, body },
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnhancerError::MalformedResponse(e.to_string()))?;

        if parsed.choices.is_empty() {
            return Err(EnhancerError::EmptyResponse);
        }

        let content = &parsed.choices[0].message.content;
        if content.trim().is_empty() {
            return Err(EnhancerError::EmptyContent);
        }

        Ok(self.strip_think_blocks(content))
    }
}
