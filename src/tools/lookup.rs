//! Shared plumbing for the lookup tools: configuration, parameters and output
//! shaping.

use crate::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const USER_AGENT: &str = concat!("search-chat/", env!("CARGO_PKG_VERSION"));
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Result caps applied by every lookup tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// How many hits to include
    pub result_count: usize,
    /// Maximum characters returned to the model
    pub max_chars: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            result_count: 1,
            max_chars: 250,
        }
    }
}

/// Parameters accepted by every lookup tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LookupParams {
    /// Search terms to look up
    #[schemars(length(min = 1))]
    pub query: String,
}

/// JSON schema for [`LookupParams`], without the draft and title headers
pub fn lookup_parameters_schema() -> Value {
    let root = schemars::schema_for!(LookupParams);
    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| {
        json!({
            "type": "object",
            "properties": {"query": {"type": "string", "minLength": 1}},
            "required": ["query"]
        })
    });

    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    schema
}

/// Decode tool arguments, reporting the failing field path
pub fn parse_lookup_params(parameters: Value) -> Result<LookupParams> {
    let params: LookupParams = serde_path_to_error::deserialize(parameters).map_err(|err| {
        AgentError::ToolExecution(format!(
            "Invalid parameters at {}: {}",
            err.path(),
            err.inner()
        ))
    })?;

    if params.query.trim().is_empty() {
        return Err(AgentError::ToolExecution(
            "query must not be empty".to_string(),
        ));
    }
    Ok(params)
}

/// HTTP client shared by the lookup tools
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(LOOKUP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Fetch `url` with `query` parameters and return the body of a successful response
pub(crate) async fn fetch_text(
    client: &reqwest::Client,
    tool: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<String> {
    let response = client.get(url).query(query).send().await.map_err(|err| {
        AgentError::ToolExecution(format!("Failed to call {}: {}", tool, err))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AgentError::ToolExecution(format!(
            "{} returned status {}",
            tool, status
        )));
    }

    response.text().await.map_err(|err| {
        AgentError::ToolExecution(format!("Failed to read {} response: {}", tool, err))
    })
}

/// Cut `text` to at most `max_chars` characters, never splitting a char
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caps() {
        let config = LookupConfig::default();
        assert_eq!(config.result_count, 1);
        assert_eq!(config.max_chars, 250);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 250), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_schema_requires_query() {
        let schema = lookup_parameters_schema();
        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["required"][0], "query");
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }

    #[test]
    fn test_parse_params_reports_path() {
        let err = parse_lookup_params(json!({"query": 3})).unwrap_err();
        assert!(err.to_string().contains("query"));

        let blank = parse_lookup_params(json!({"query": "  "}));
        assert!(blank.is_err());

        let ok = parse_lookup_params(json!({"query": "rust"})).unwrap();
        assert_eq!(ok.query, "rust");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n  b\tc "), "a b c");
    }
}
