//! OpenAI-compatible chat completion explainer

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Explainer, ExplainerError, ExplanationResult};
use crate::config::ExplainerConfig;
use crate::error::{MarketError, Result};

const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct OpenAiExplainer {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl OpenAiExplainer {
    pub fn new(config: &ExplainerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Explainer for OpenAiExplainer {
    async fn explain(&self, prompt: &str) -> ExplanationResult {
        let api_key = match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(ExplainerError::Auth {
                    message: "no API credential configured".into(),
                });
            }
        };

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Requesting explanation (model={}, prompt_chars={})",
            self.model,
            prompt.len()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(network_error)?;

        if !status.is_success() {
            warn!("Explanation request failed with HTTP {}", status.as_u16());
            return Err(classify_status(status, &text));
        }

        extract_completion(&text)
    }
}

fn network_error(err: reqwest::Error) -> ExplainerError {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    ExplainerError::Network { message }
}

/// Map a non-success HTTP status to a failure kind
fn classify_status(status: StatusCode, body: &str) -> ExplainerError {
    let detail = error_detail(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExplainerError::Auth {
            message: format!("HTTP {}: {}", status.as_u16(), detail),
        },
        _ => ExplainerError::Upstream {
            message: format!("HTTP {}: {}", status.as_u16(), detail),
        },
    }
}

/// Prefer the structured `error.message` field, else a truncated body
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY_CHARS).collect())
}

/// Pull `choices[0].message.content` out of a completion body
fn extract_completion(body: &str) -> ExplanationResult {
    let val: Value = serde_json::from_str(body).map_err(|e| ExplainerError::Upstream {
        message: format!("response was not valid JSON: {}", e),
    })?;

    if let Some(err) = val.get("error") {
        return Err(ExplainerError::Upstream {
            message: err
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
        });
    }

    val.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ExplainerError::Upstream {
            message: "response lacked choices[0].message.content".into(),
        })
}
