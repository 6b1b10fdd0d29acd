use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

pub const DEFAULT_DATASET_PATH: &str = "commerial_dataset_merged_supply demand.csv";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LOG_LEVEL: &str = "market_lens=info";
pub const DEFAULT_CONFIG_PATH: &str = "market_lens.toml";

const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 120;

/// Main configuration structure loaded from market_lens.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub explainer: ExplainerConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Location of the category dataset
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATASET_PATH.to_string(),
        }
    }
}

/// Text-generation endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Never read from or written to the TOML file
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.4,
            max_tokens: Some(600),
            timeout_secs: 45,
        }
    }
}

impl ExplainerConfig {
    /// Apply environment overrides on top of file values
    pub fn apply_env(&mut self) {
        self.api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            self.base_url = base;
        }
        if let Ok(model) = std::env::var("MARKET_LENS_MODEL") {
            self.model = model;
        }
        if let Some(t) = std::env::var("MARKET_LENS_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            self.temperature = t;
        }
        if let Ok(v) = std::env::var("MARKET_LENS_MAX_TOKENS") {
            // 0 removes the bound
            self.max_tokens = v.parse::<u32>().ok().filter(|n| *n > 0);
        }
        if let Some(secs) = std::env::var("MARKET_LENS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
    }

    /// Validate the configuration
    pub fn validate(&mut self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(MarketError::Config {
                message: "explainer model must not be empty".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(MarketError::Config {
                message: format!(
                    "explainer temperature must be between 0.0 and 2.0, got {}",
                    self.temperature
                ),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(MarketError::Config {
                message: format!(
                    "explainer base_url '{}' must start with http:// or https://",
                    self.base_url
                ),
            });
        }
        let clamped = self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        if clamped != self.timeout_secs {
            tracing::warn!(
                "explainer timeout_secs {} outside {}..={}, clamping to {}",
                self.timeout_secs,
                MIN_TIMEOUT_SECS,
                MAX_TIMEOUT_SECS,
                clamped
            );
            self.timeout_secs = clamped;
        }
        Ok(())
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses MARKET_LENS_CONFIG environment variable or defaults to "market_lens.toml"
    pub fn load() -> Result<Self> {
        load_env_files();
        Self::load_with(None)
    }

    /// Resolve the config file and load it. A path given explicitly (argument
    /// or MARKET_LENS_CONFIG) must exist; only the implicit default may be absent.
    pub fn load_with(config_path: Option<&str>) -> Result<Self> {
        let explicit = config_path
            .map(str::to_string)
            .or_else(|| std::env::var("MARKET_LENS_CONFIG").ok());
        match explicit {
            Some(path) => Self::load_required(&path),
            None => Self::load_from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Load from an explicit TOML path, then apply environment overrides.
    /// A missing file logs a warning and falls back to defaults.
    pub fn load_from(config_path: &str) -> Result<Self> {
        Self::read_file(config_path, false)?.finish()
    }

    /// Like [`Config::load_from`], but a missing or unreadable file is an error
    pub fn load_required(config_path: &str) -> Result<Self> {
        Self::read_file(config_path, true)?.finish()
    }

    fn read_file(config_path: &str, required: bool) -> Result<Self> {
        match std::fs::read_to_string(config_path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if required => Err(MarketError::Config {
                message: format!("cannot read config file {}: {}", config_path, e),
            }),
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Ok(Self::default())
            }
        }
    }

    fn finish(mut self) -> Result<Self> {
        if let Ok(path) = std::env::var("MARKET_LENS_DATASET") {
            tracing::debug!("MARKET_LENS_DATASET env override applied");
            self.dataset.path = path;
        }
        self.explainer.apply_env();
        self.runtime = RuntimeConfig::load_from_env();

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&mut self) -> Result<()> {
        if self.dataset.path.trim().is_empty() {
            return Err(MarketError::Config {
                message: "dataset path must not be empty".into(),
            });
        }
        self.explainer.validate()
    }
}

/// Environment file resolution:
/// 1) MARKET_LENS_ENV_FILE if set
/// 2) ./.env
/// 3) ../.env when the credential is still missing
pub fn load_env_files() {
    if let Ok(env_path) = std::env::var("MARKET_LENS_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
        return;
    }
    let _ = dotenvy::from_path(".env");
    if std::env::var("OPENAI_API_KEY").is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}
