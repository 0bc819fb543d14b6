//! Runtime configuration: built-in defaults, overridden by environment
//! variables (a `.env` file is honoured by the binary), overridden by CLI flags.

use crate::{
    error::{AgentError, Result},
    services::chat_client,
    tools::{arxiv, web_search, wikipedia, LookupConfig},
};
use std::{str::FromStr, time::Duration};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub const MODEL_ENV: &str = "GROQ_MODEL";
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";
pub const MAX_ITERATIONS_ENV: &str = "SEARCH_CHAT_MAX_ITERATIONS";
pub const MAX_TOKENS_ENV: &str = "SEARCH_CHAT_MAX_TOKENS";
pub const TIMEOUT_ENV: &str = "SEARCH_CHAT_TIMEOUT_SECS";
pub const RUN_TIMEOUT_ENV: &str = "SEARCH_CHAT_RUN_TIMEOUT_SECS";
pub const RESULT_COUNT_ENV: &str = "SEARCH_CHAT_RESULT_COUNT";
pub const MAX_CHARS_ENV: &str = "SEARCH_CHAT_MAX_CHARS";
pub const WIKIPEDIA_URL_ENV: &str = "SEARCH_CHAT_WIKIPEDIA_URL";
pub const ARXIV_URL_ENV: &str = "SEARCH_CHAT_ARXIV_URL";
pub const SEARCH_URL_ENV: &str = "SEARCH_CHAT_SEARCH_URL";

/// Where each lookup tool sends its requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEndpoints {
    pub wikipedia: String,
    pub arxiv: String,
    pub search: String,
}

impl Default for ToolEndpoints {
    fn default() -> Self {
        Self {
            wikipedia: wikipedia::DEFAULT_BASE_URL.to_string(),
            arxiv: arxiv::DEFAULT_BASE_URL.to_string(),
            search: web_search::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub model: String,
    pub base_url: String,
    pub max_iterations: usize,
    pub max_tokens: Option<u32>,
    /// Per chat-completions request
    pub request_timeout: Duration,
    /// Whole reasoning run
    pub run_timeout: Duration,
    pub lookup: LookupConfig,
    pub endpoints: ToolEndpoints,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: chat_client::DEFAULT_BASE_URL.to_string(),
            max_iterations: 10,
            max_tokens: Some(1000),
            request_timeout: Duration::from_secs(60),
            run_timeout: Duration::from_secs(300),
            lookup: LookupConfig::default(),
            endpoints: ToolEndpoints::default(),
        }
    }
}

impl ChatConfig {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(model) = get(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(value) = get(MAX_ITERATIONS_ENV) {
            config.max_iterations = parse_setting(MAX_ITERATIONS_ENV, &value)?;
        }
        if let Some(value) = get(MAX_TOKENS_ENV) {
            config.max_tokens = Some(parse_setting(MAX_TOKENS_ENV, &value)?);
        }
        if let Some(value) = get(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(parse_setting(TIMEOUT_ENV, &value)?);
        }
        if let Some(value) = get(RUN_TIMEOUT_ENV) {
            config.run_timeout = Duration::from_secs(parse_setting(RUN_TIMEOUT_ENV, &value)?);
        }
        if let Some(value) = get(RESULT_COUNT_ENV) {
            config.lookup.result_count = parse_setting(RESULT_COUNT_ENV, &value)?;
        }
        if let Some(value) = get(MAX_CHARS_ENV) {
            config.lookup.max_chars = parse_setting(MAX_CHARS_ENV, &value)?;
        }
        if let Some(url) = get(WIKIPEDIA_URL_ENV) {
            config.endpoints.wikipedia = url;
        }
        if let Some(url) = get(ARXIV_URL_ENV) {
            config.endpoints.arxiv = url;
        }
        if let Some(url) = get(SEARCH_URL_ENV) {
            config.endpoints.search = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every turn fail
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AgentError::Config("model must not be empty".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(AgentError::Config(
                "max iterations must be at least 1".to_string(),
            ));
        }
        if self.lookup.result_count == 0 {
            return Err(AgentError::Config(
                "result count must be at least 1".to_string(),
            ));
        }
        if self.lookup.max_chars == 0 {
            return Err(AgentError::Config(
                "max chars must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() || self.run_timeout.is_zero() {
            return Err(AgentError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn parse_setting<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|err| AgentError::Config(format!("invalid value `{}` for {}: {}", value, name, err)))
}
