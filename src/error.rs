//! Domain-specific error types for market-lens

use thiserror::Error;

use crate::explainer::ExplainerError;

/// Main error type for market-lens
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Dataset load error ({path}): {message}")]
    DataLoad { path: String, message: String },

    #[error("Category not found: {category}")]
    NotFound { category: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Explanation error: {0}")]
    Explanation(#[from] ExplainerError),
}

impl MarketError {
    pub fn data_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        MarketError::DataLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for MarketError {
    fn from(err: toml::de::Error) -> Self {
        MarketError::Config {
            message: format!("Invalid TOML: {}", err),
        }
    }
}

/// Result type alias for market-lens operations
pub type Result<T> = std::result::Result<T, MarketError>;
