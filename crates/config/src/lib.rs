//! Configuration loading, validation, and management for thinkloop.
//!
//! Loads configuration from `~/.thinkloop/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const REDACTED: &str = "[REDACTED]";

/// The root configuration structure.
///
/// Maps directly to `~/.thinkloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion gateway settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Controller settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Web search tool settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Completion gateway (OpenAI-compatible endpoint) settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL up to and including the API version, e.g. `https://api.openai.com/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Default temperature when a call does not specify one
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Default output token cap (none = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.0
}
fn default_llm_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Gateway settings with every required field present.
#[derive(Clone)]
pub struct ResolvedLlm<'a> {
    pub api_key: &'a str,
    pub base_url: &'a str,
    pub model: &'a str,
}

impl LlmConfig {
    /// Check that the API key, base URL and model are all set.
    pub fn require_complete(&self) -> Result<ResolvedLlm<'_>, ConfigError> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("LLM_API_KEY");
        }
        if self.base_url.is_none() {
            missing.push("LLM_BASE_URL");
        }
        if self.model.is_none() {
            missing.push("LLM_MODEL_ID");
        }

        match (&self.api_key, &self.base_url, &self.model) {
            (Some(api_key), Some(base_url), Some(model)) => Ok(ResolvedLlm {
                api_key,
                base_url,
                model,
            }),
            _ => Err(ConfigError::Missing(missing.join(", "))),
        }
    }
}

/// Controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Upper bound on ReAct iterations per run
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Temperature override for the planner call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner_temperature: Option<f32>,

    /// Temperature override for executor calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_temperature: Option<f32>,
}

fn default_max_steps() -> usize {
    5
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            planner_temperature: None,
            executor_temperature: None,
        }
    }
}

/// SerpApi web search settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_engine")]
    pub engine: String,

    /// Country code
    #[serde(default = "default_gl")]
    pub gl: String,

    /// Language code
    #[serde(default = "default_hl")]
    pub hl: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_engine() -> String {
    "google".into()
}
fn default_gl() -> String {
    "cn".into()
}
fn default_hl() -> String {
    "zh-cn".into()
}
fn default_search_timeout() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine: default_engine(),
            gl: default_gl(),
            hl: default_hl(),
            timeout_secs: default_search_timeout(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => REDACTED,
        None => "None",
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("engine", &self.engine)
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.thinkloop/config.toml),
    /// then apply environment overrides:
    /// - `LLM_API_KEY`, `LLM_BASE_URL`, `LLM_MODEL_ID`, `LLM_TIMEOUT`, `LLM_TEMPERATURE`
    /// - `THINKLOOP_MAX_STEPS`
    /// - `SERPAPI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Set variables win over
    /// file values; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = var("LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Some(model) = var("LLM_MODEL_ID") {
            self.llm.model = Some(model);
        }
        if let Some(timeout) = var("LLM_TIMEOUT") {
            self.llm.timeout_secs = parse_var("LLM_TIMEOUT", &timeout)?;
        }
        if let Some(temperature) = var("LLM_TEMPERATURE") {
            self.llm.temperature = parse_var("LLM_TEMPERATURE", &temperature)?;
        }
        if let Some(steps) = var("THINKLOOP_MAX_STEPS") {
            self.agent.max_steps = parse_var("THINKLOOP_MAX_STEPS", &steps)?;
        }
        if let Some(key) = var("SERPAPI_API_KEY") {
            self.search.api_key = Some(key);
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".thinkloop")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        check_temperature("llm.temperature", self.llm.temperature)?;
        if let Some(t) = self.agent.planner_temperature {
            check_temperature("agent.planner_temperature", t)?;
        }
        if let Some(t) = self.agent.executor_temperature {
            check_temperature("agent.executor_temperature", t)?;
        }

        if self.agent.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_steps must be at least 1".into(),
            ));
        }

        if self.llm.timeout_secs == 0 || self.search.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// A copy safe to print: API keys are replaced with a mask.
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| REDACTED.to_string());
        let mut config = self.clone();
        config.llm.api_key = mask(&self.llm.api_key);
        config.search.api_key = mask(&self.search.api_key);
        config
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn check_temperature(field: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be between 0.0 and 2.0"
        )));
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key} has an invalid value: {raw}")))
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required settings: {0} (set them in the environment, a .env file, or config.toml)")]
    Missing(String),
}
