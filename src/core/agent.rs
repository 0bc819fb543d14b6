use super::{observer::StepObserver, reasoner::Reasoner};
use crate::{
    config::DEFAULT_MODEL,
    error::Result,
    services::chat_client::ChatClient,
    session::Transcript,
    tools::FunctionFactory,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful research assistant that can look things up. \
Use the `wikipedia` tool for encyclopedic facts, the `arxiv` tool for academic papers and the `search` tool for anything else on the web. \
Only call a tool when the question needs information you are not sure about. \
When you are ready to give the final response, call the `final_answer` tool with an `answer` string.";

/// Tool-calling agent driving an OpenAI-compatible chat model
#[derive(Debug)]
pub struct Agent {
    client: ChatClient,
    function_factory: FunctionFactory,
    model: String,
    system_prompt: String,
    max_iterations: usize,
    max_tokens: Option<u32>,
    request_timeout: Duration,
    run_timeout: Duration,
}

impl Agent {
    pub fn new(api_key: impl Into<String>, function_factory: FunctionFactory) -> Self {
        Self {
            client: ChatClient::new(api_key),
            function_factory,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: 10,
            max_tokens: Some(1000),
            request_timeout: Duration::from_secs(60),
            run_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Timeout for each chat-completions request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Upper bound on a whole run, tool calls included
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.function_factory.tool_names()
    }

    pub(crate) fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) fn run_timeout(&self) -> Duration {
        self.run_timeout
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.client
            .chat_completion(request_body, self.request_timeout)
            .await
    }
}

#[async_trait]
impl Reasoner for Agent {
    async fn run(&self, transcript: &Transcript, observer: StepObserver) -> Result<String> {
        let result = self.run_with_steps(transcript, &observer).await?;
        debug!(target: "search_chat::steps", "{}", result.replay());
        Ok(result.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let agent = Agent::new("key", FunctionFactory::new())
            .with_model("llama-3.1-8b-instant")
            .with_max_iterations(3)
            .with_run_timeout(Duration::from_secs(5));

        assert_eq!(agent.model(), "llama-3.1-8b-instant");
        assert_eq!(agent.max_iterations(), 3);
        assert_eq!(agent.run_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let agent = Agent::new("gsk_very_secret", FunctionFactory::new());
        assert!(!format!("{:?}", agent).contains("gsk_very_secret"));
    }
}
