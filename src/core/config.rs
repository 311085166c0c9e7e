//! Generator configuration with documented defaults
//!
//! Values come from three layers, later layers winning:
//! built-in defaults, an optional TOML file, then environment variables.
//! The API credential is only ever read from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CodexError, Result};

/// Environment variable holding the API credential (required)
pub const API_KEY_VAR: &str = "LLM_API_KEY";
/// Environment variable overriding the endpoint URL
pub const API_URL_VAR: &str = "LLM_API_URL";
/// Environment variable overriding the model identifier
pub const MODEL_VAR: &str = "LLM_MODEL";

/// What to do when a stage returns a World State that breaks the
/// scene/location integrity rule or repeats ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Fail the stage and report the violations
    #[default]
    Reject,
    /// Send one corrective request with the violations, then reject
    Reask,
}

/// Configuration for the generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model identifier sent with each request
    pub model: String,

    /// Endpoint URL
    ///
    /// For Gemini the `{model}` placeholder is replaced with `model`.
    /// The request format (Gemini, OpenAI-compatible, Anthropic) is
    /// detected from this URL.
    pub api_url: String,

    /// Sampling temperature
    ///
    /// 0.4 keeps extraction faithful while leaving the expansion pass
    /// some room to invent.
    pub temperature: f32,

    /// Upper bound on generated tokens per request
    ///
    /// An expanded World State with a ten-sublocation hub routinely runs
    /// past 20k tokens, so this is set high.
    pub max_output_tokens: u32,

    /// Transport timeout; `None` keeps the HTTP client default
    pub request_timeout_secs: Option<u64>,

    /// Recovery policy for hard integrity violations
    pub integrity_policy: IntegrityPolicy,

    /// Game system named in the prompts, e.g. "Degenesis: Rebirth"
    pub game_system: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-pro".into(),
            api_url: "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
                .into(),
            temperature: 0.4,
            max_output_tokens: 65536,
            request_timeout_secs: None,
            integrity_policy: IntegrityPolicy::Reject,
            game_system: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CodexError::Configuration(format!("Invalid config TOML: {}", e)))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CodexError::Configuration(format!("Failed to read config {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `LLM_API_URL` / `LLM_MODEL` overrides from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_VAR) {
            self.api_url = url;
        }
        if let Ok(model) = std::env::var(MODEL_VAR) {
            self.model = model;
        }
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CodexError::Configuration("model must not be empty".into()));
        }
        if self.api_url.trim().is_empty() {
            return Err(CodexError::Configuration("api_url must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CodexError::Configuration(format!(
                "temperature ({}) must be within 0.0..=2.0",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(CodexError::Configuration(
                "max_output_tokens must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint URL with the model placeholder filled in
    pub fn resolved_url(&self) -> String {
        self.api_url.replace("{model}", &self.model)
    }
}

/// Read the API credential from the environment
///
/// A missing or blank key is a fatal startup error.
pub fn api_key_from_env() -> Result<String> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(CodexError::Configuration(format!("{} not set", API_KEY_VAR))),
    }
}
