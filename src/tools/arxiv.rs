use super::{
    lookup::{
        collapse_whitespace, fetch_text, http_client, lookup_parameters_schema,
        parse_lookup_params, truncate_chars, LookupConfig,
    },
    Tool, ToolFuture,
};
use crate::{AgentError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://export.arxiv.org/api/query";
const NO_RESULT: &str = "No good Arxiv Result was found";

/// One paper from an arXiv Atom feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivEntry {
    pub published: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
}

impl ArxivEntry {
    fn render(&self) -> String {
        format!(
            "Published: {}\nTitle: {}\nAuthors: {}\nSummary: {}",
            self.published,
            self.title,
            self.authors.join(", "),
            self.summary
        )
    }
}

/// Academic paper lookup through the arXiv query API
#[derive(Debug, Clone)]
pub struct ArxivTool {
    client: Client,
    base_url: String,
    config: LookupConfig,
}

impl Default for ArxivTool {
    fn default() -> Self {
        Self::new(LookupConfig::default())
    }
}

impl ArxivTool {
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

    /// Metadata and abstracts of the best matching papers for `text`
    pub async fn query(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::ToolExecution("query must not be empty".to_string()));
        }

        let params = [
            ("search_query", format!("all:{}", text)),
            ("start", "0".to_string()),
            ("max_results", self.config.result_count.to_string()),
        ];

        debug!(target: "search_chat::tools", tool = "arxiv", query = text);
        let body = fetch_text(&self.client, "arXiv", &self.base_url, &params).await?;
        Ok(format_entries(&parse_feed(&body), &self.config))
    }
}

fn format_entries(entries: &[ArxivEntry], config: &LookupConfig) -> String {
    let rendered: Vec<String> = entries
        .iter()
        .take(config.result_count)
        .map(ArxivEntry::render)
        .collect();

    if rendered.is_empty() {
        return NO_RESULT.to_string();
    }

    truncate_chars(&rendered.join("\n\n"), config.max_chars)
}

/// Extract entries from an Atom feed as served by arXiv
pub fn parse_feed(xml: &str) -> Vec<ArxivEntry> {
    element_bodies(xml, "entry")
        .into_iter()
        .filter_map(|entry| {
            let title = first_text(entry, "title")?;
            let published = first_text(entry, "published")
                .map(|stamp| stamp.split('T').next().unwrap_or_default().to_string())
                .unwrap_or_default();
            let authors = element_bodies(entry, "author")
                .into_iter()
                .filter_map(|author| first_text(author, "name"))
                .collect();
            let summary = first_text(entry, "summary").unwrap_or_default();

            Some(ArxivEntry {
                published,
                title,
                authors,
                summary,
            })
        })
        .collect()
}

fn first_text(xml: &str, tag: &str) -> Option<String> {
    element_bodies(xml, tag)
        .first()
        .map(|body| collapse_whitespace(&decode_entities(body)))
}

/// Inner text of every `<tag ...>...</tag>` element, in document order.
/// Self-closing elements are skipped; nesting of the same tag is not supported.
fn element_bodies<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut bodies = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find(&open) {
        let after_name = &rest[start + open.len()..];

        // `<titles>` must not match `<title`
        if !after_name.starts_with(|c: char| c == '>' || c.is_whitespace()) {
            rest = after_name;
            continue;
        }

        let Some(tag_end) = after_name.find('>') else {
            break;
        };
        if after_name[..tag_end].ends_with('/') {
            rest = &after_name[tag_end + 1..];
            continue;
        }

        let body = &after_name[tag_end + 1..];
        let Some(body_end) = body.find(&close) else {
            break;
        };
        bodies.push(&body[..body_end]);
        rest = &body[body_end + close.len()..];
    }

    bodies
}

/// Decode named and numeric character references in one pass
fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let entity = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|ch| (ch, end)));

        match entity {
            Some((ch, end)) => {
                decoded.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

impl Tool for ArxivTool {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn description(&self) -> &'static str {
        "Search arXiv for scientific papers in physics, mathematics, computer science and related fields. Input is a search query."
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

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models are based on complex
recurrent &amp; convolutional neural networks.
    </summary>
    <author>
      <name>Ashish Vaswani</name>
    </author>
    <author>
      <name>Noam Shazeer</name>
      <arxiv:affiliation xmlns:arxiv="http://arxiv.org/schemas/atom">Google</arxiv:affiliation>
    </author>
    <link href="http://arxiv.org/abs/1706.03762v7" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let entries = parse_feed(FEED);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.published, "2017-06-12");
        assert_eq!(entry.title, "Attention Is All You Need");
        assert_eq!(entry.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert!(entry.summary.starts_with("The dominant"));
        assert!(entry.summary.contains("recurrent & convolutional"));
    }

    #[test]
    fn test_numeric_references_are_decoded() {
        assert_eq!(decode_entities("Don&#39;t Stop"), "Don't Stop");
        assert_eq!(decode_entities("it&#x2019;s &amp;lt;"), "it\u{2019}s &lt;");
        assert_eq!(decode_entities("R&D &#xZZ; &"), "R&D &#xZZ; &");

        let feed = "<feed><entry><title>Don&#39;t Stop Pretraining</title></entry></feed>";
        assert_eq!(parse_feed(feed)[0].title, "Don't Stop Pretraining");
    }

    #[test]
    fn test_feed_title_outside_entries_ignored() {
        let feed = r#"<feed><title>ArXiv Query</title></feed>"#;
        assert!(parse_feed(feed).is_empty());
        assert_eq!(format_entries(&[], &LookupConfig::default()), NO_RESULT);
    }

    #[test]
    fn test_format_entry() {
        let config = LookupConfig {
            result_count: 1,
            max_chars: 10_000,
        };
        let formatted = format_entries(&parse_feed(FEED), &config);
        assert_eq!(
            formatted.lines().take(3).collect::<Vec<_>>(),
            vec![
                "Published: 2017-06-12",
                "Title: Attention Is All You Need",
                "Authors: Ashish Vaswani, Noam Shazeer"
            ]
        );
    }

    #[tokio::test]
    async fn test_query_against_mock_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search_query".into(), "all:attention".into()),
                Matcher::UrlEncoded("max_results".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let tool = ArxivTool::default().with_base_url(format!("{}/api/query", server.url()));
        let result = tool.query("attention").await.unwrap();

        assert!(result.starts_with("Published: 2017-06-12\nTitle: Attention Is All You Need"));
        assert!(result.chars().count() <= 250);
        mock.assert_async().await;
    }
}
