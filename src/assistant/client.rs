//! Chat gateway to a locally hosted OpenAI-compatible completion server

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::AssistantConfig;
use crate::error::DashboardError;
use crate::metrics::METRICS;

/// Completion service errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Completion service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Completion service returned no choices")]
    EmptyResponse,
}

impl From<GatewayError> for DashboardError {
    fn from(e: GatewayError) -> Self {
        DashboardError::Upstream(e.to_string())
    }
}

/// Single-shot completion call; no retries
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, GatewayError>;

    /// Whether the completion service answers at all
    async fn probe(&self) -> bool;

    fn base_url(&self) -> &str;

    fn model(&self) -> &str;
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for LM Studio or any server exposing `/chat/completions`
pub struct LocalModelClient {
    http: Client,
    config: AssistantConfig,
}

impl LocalModelClient {
    pub fn new(config: AssistantConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn call(&self, system_prompt: &str, user_query: &str) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(user_query.to_string()),
                },
            ],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let mut req = self.http.post(self.endpoint("chat/completions")).json(&request);
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl ChatGateway for LocalModelClient {
    async fn complete(&self, system_prompt: &str, user_query: &str) -> Result<String, GatewayError> {
        debug!(
            model = %self.config.model,
            prompt_chars = system_prompt.len(),
            "Calling completion service"
        );

        let start = Instant::now();
        let result = self.call(system_prompt, user_query).await;
        METRICS
            .upstream_duration
            .observe(start.elapsed().as_secs_f64());
        METRICS.record_assistant(result.is_ok());

        if let Err(e) = &result {
            error!("Completion service call failed: {}", e);
        }
        result
    }

    async fn probe(&self) -> bool {
        match self
            .http
            .get(self.endpoint("models"))
            .timeout(self.config.probe_timeout())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Model probe failed: {}", e);
                false
            }
        }
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
