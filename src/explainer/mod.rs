//! Natural-language explanations for a category's indicators
//!
//! The controller only sees the [`Explainer`] trait; [`OpenAiExplainer`] is the
//! network-backed implementation.

pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiExplainer;
pub use prompt::{build_prompt, build_prompt_for};

/// Why an explanation request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainerError {
    #[error("authentication failed: {message}")]
    Auth { message: String },
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("upstream service error: {message}")]
    Upstream { message: String },
}

impl ExplainerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExplainerError::Auth { .. } => FailureKind::Auth,
            ExplainerError::Network { .. } => FailureKind::Network,
            ExplainerError::Upstream { .. } => FailureKind::Upstream,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ExplainerError::Auth { message }
            | ExplainerError::Network { message }
            | ExplainerError::Upstream { message } => message,
        }
    }
}

/// Failure category, kept separately from the detail text so session state
/// stays serializable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Auth,
    Network,
    Upstream,
}

impl FailureKind {
    /// Message shown to the user for this failure kind
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Auth => {
                "Could not authenticate with the explanation service. Check that OPENAI_API_KEY is set and valid."
            }
            FailureKind::Network => {
                "The explanation service could not be reached or timed out. Check your connection and try again."
            }
            FailureKind::Upstream => {
                "The explanation service returned an error or an unexpected response. Try again shortly."
            }
        }
    }
}

pub type ExplanationResult = std::result::Result<String, ExplainerError>;

/// Prompt in, completion text or classified failure out
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, prompt: &str) -> ExplanationResult;
}
