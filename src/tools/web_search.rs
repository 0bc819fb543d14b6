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

pub const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";
const NO_RESULT: &str = "No good DuckDuckGo Search Result was found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// A plain topic, a named group of topics, or an entry with neither
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Topic {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Other(Value),
}

impl RelatedTopic {
    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            RelatedTopic::Topic { text } => out.push(text),
            RelatedTopic::Group { topics } => {
                for topic in topics {
                    topic.collect_texts(out);
                }
            }
            RelatedTopic::Other(_) => {}
        }
    }
}

/// General web lookup through the DuckDuckGo Instant Answer API
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    client: Client,
    base_url: String,
    config: LookupConfig,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new(LookupConfig::default())
    }
}

impl WebSearchTool {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            client: http_client(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Snippets for `text`, best match first
    pub async fn query(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::ToolExecution("query must not be empty".to_string()));
        }

        let params = [
            ("q", text.to_string()),
            ("format", "json".to_string()),
            ("no_html", "1".to_string()),
            ("skip_disambig", "1".to_string()),
        ];

        debug!(target: "search_chat::tools", tool = "search", query = text);
        // served as application/x-javascript, so decode by hand
        let body = fetch_text(&self.client, "DuckDuckGo", &self.base_url, &params).await?;
        let parsed: InstantAnswer = serde_json::from_str(&body).map_err(|err| {
            AgentError::ToolExecution(format!("Unexpected DuckDuckGo response: {}", err))
        })?;

        Ok(format_answer(&parsed, &self.config))
    }
}

/// The abstract when present, then up to `result_count` related topics
fn format_answer(answer: &InstantAnswer, config: &LookupConfig) -> String {
    let mut topics: Vec<&str> = Vec::new();
    for topic in &answer.related_topics {
        topic.collect_texts(&mut topics);
    }

    let abstract_text = answer.abstract_text.trim();
    let snippets: Vec<&str> = (!abstract_text.is_empty())
        .then_some(abstract_text)
        .into_iter()
        .chain(
            topics
                .into_iter()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .take(config.result_count),
        )
        .collect();

    if snippets.is_empty() {
        return NO_RESULT.to_string();
    }

    truncate_chars(&snippets.join("\n\n"), config.max_chars)
}

impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search the web for current events and anything not covered by Wikipedia or arXiv. Input is a search query."
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
