use super::{
    lookup::{
        fetch_text, http_client, lookup_parameters_schema, parse_lookup_params, truncate_chars,
        LookupConfig,
    },
    Tool, ToolFuture,
};
use crate::{AgentError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/w/api.php";
const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: String,
}

/// Encyclopedia lookup through the MediaWiki search API
#[derive(Debug, Clone)]
pub struct WikipediaTool {
    client: Client,
    base_url: String,
    config: LookupConfig,
}

impl Default for WikipediaTool {
    fn default() -> Self {
        Self::new(LookupConfig::default())
    }
}

impl WikipediaTool {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            client: http_client(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        }
    }

    /// Point at another MediaWiki `api.php` endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Summaries of the best matching pages for `text`
    pub async fn query(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::ToolExecution("query must not be empty".to_string()));
        }

        let limit = self.config.result_count.to_string();
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
            ("generator", "search".to_string()),
            ("gsrsearch", text.to_string()),
            ("gsrlimit", limit.clone()),
            ("prop", "extracts".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("exlimit", limit),
            ("redirects", "1".to_string()),
        ];

        debug!(target: "search_chat::tools", tool = "wikipedia", query = text);
        let body = fetch_text(&self.client, "Wikipedia", &self.base_url, &params).await?;
        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|err| {
            AgentError::ToolExecution(format!("Unexpected Wikipedia response: {}", err))
        })?;

        Ok(format_pages(parsed, &self.config))
    }
}

fn format_pages(response: SearchResponse, config: &LookupConfig) -> String {
    let mut pages = response.query.unwrap_or_default().pages;
    pages.sort_by_key(|page| page.index);

    let summaries: Vec<String> = pages
        .into_iter()
        .take(config.result_count)
        .map(|page| format!("Page: {}\nSummary: {}", page.title, page.extract.trim()))
        .collect();

    if summaries.is_empty() {
        return NO_RESULT.to_string();
    }

    truncate_chars(&summaries.join("\n\n"), config.max_chars)
}

impl Tool for WikipediaTool {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn description(&self) -> &'static str {
        "Look up people, places, companies, historical events and other general knowledge on Wikipedia. Input is a search query."
    }

    fn parameters_schema(&self) -> Value {
        lookup_parameters_schema()
    }

    fn execute(&self, parameters: Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params = parse_lookup_params(parameters)?;
            self.query(&params.query).await.map(Value::String)
        })
    }
}
