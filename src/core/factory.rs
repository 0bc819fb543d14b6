use super::{
    agent::Agent,
    credentials::Credentials,
    reasoner::{Reasoner, ReasonerFactory},
};
use crate::{
    config::ChatConfig,
    error::Result,
    tools::{ArxivTool, FunctionFactory, WebSearchTool, WikipediaTool},
};
use tracing::debug;

/// Builds a fresh [`Agent`] with the lookup tools for every turn
#[derive(Debug, Clone)]
pub struct AgentFactory {
    config: ChatConfig,
}

impl AgentFactory {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Tool registry with wikipedia, arxiv and search
    pub fn lookup_tools(&self) -> FunctionFactory {
        let lookup = self.config.lookup.clone();
        let endpoints = &self.config.endpoints;

        let mut factory = FunctionFactory::new();
        factory.register_tool(
            WikipediaTool::new(lookup.clone()).with_base_url(endpoints.wikipedia.clone()),
        );
        factory.register_tool(ArxivTool::new(lookup.clone()).with_base_url(endpoints.arxiv.clone()));
        factory.register_tool(WebSearchTool::new(lookup).with_base_url(endpoints.search.clone()));
        factory
    }

    pub fn build_agent(&self, credentials: &Credentials) -> Result<Agent> {
        let api_key = credentials.api_key()?;
        let config = &self.config;

        debug!(
            target: "search_chat::session",
            model = %config.model,
            base_url = %config.base_url,
            "building agent"
        );

        Ok(Agent::new(api_key, self.lookup_tools())
            .with_model(config.model.as_str())
            .with_base_url(config.base_url.as_str())
            .with_max_iterations(config.max_iterations)
            .with_max_tokens(config.max_tokens)
            .with_timeout(config.request_timeout)
            .with_run_timeout(config.run_timeout))
    }
}

impl ReasonerFactory for AgentFactory {
    fn build(&self, credentials: &Credentials) -> Result<Box<dyn Reasoner>> {
        Ok(Box::new(self.build_agent(credentials)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentError;

    #[test]
    fn test_missing_credentials_fail_at_build() {
        let factory = AgentFactory::new(ChatConfig::default());
        let err = factory.build(&Credentials::none()).err().unwrap();
        assert!(matches!(err, AgentError::MissingCredentials(_)));
    }

    #[test]
    fn test_agent_has_all_lookup_tools() {
        let factory = AgentFactory::new(ChatConfig::default());
        let agent = factory.build_agent(&Credentials::new("key")).unwrap();
        assert_eq!(agent.tool_names(), vec!["arxiv", "search", "wikipedia"]);
    }
}
