use std::env;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{AgentError, AgentResult};

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// The models this client knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, AsRefStr)]
pub enum Model {
    #[strum(serialize = "claude-opus-4-6")]
    ClaudeOpus46,
    #[default]
    #[strum(serialize = "claude-haiku-4-5")]
    ClaudeHaiku45,
    #[strum(serialize = "claude-sonnet-4-5")]
    ClaudeSonnet45,
}

#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: Model,
    pub max_tokens: u32,
}

impl AnthropicProviderConfig {
    pub fn new<S: Into<String>>(api_key: S, model: Model, max_tokens: u32) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
            model,
            max_tokens,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Load the credential (and optionally the host) from the environment
    pub fn from_env(model: Model, max_tokens: u32) -> AgentResult<Self> {
        let api_key = get_env("ANTHROPIC_API_KEY", true, None)?
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AgentError::Config("ANTHROPIC_API_KEY must not be empty".to_string()))?;

        let host = get_env("ANTHROPIC_HOST", false, Some(ANTHROPIC_HOST.to_string()))?
            .unwrap_or_else(|| ANTHROPIC_HOST.to_string());

        let config = Self::new(api_key, model, max_tokens).with_host(host);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AgentResult<()> {
        if self.max_tokens == 0 {
            return Err(AgentError::Config(
                "max_tokens must be greater than zero".to_string(),
            ));
        }
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(AgentError::Config(format!(
                "host must be an http(s) URL, got '{}'",
                self.host
            )));
        }
        Ok(())
    }
}

/// Read an environment variable, distinguishing "required" from "optional with default"
fn get_env(key: &str, required: bool, default: Option<String>) -> AgentResult<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) if !required => Ok(default),
        Err(env::VarError::NotPresent) => Err(AgentError::Config(format!(
            "Environment variable '{}' is required but not set.",
            key
        ))),
        Err(e) => Err(AgentError::Config(format!("Environment variable '{}': {}", key, e))),
    }
}
