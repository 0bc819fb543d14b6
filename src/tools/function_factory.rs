use super::{tool::ToolRegistry, Tool};
use crate::{AgentError, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Registers tools and executes calls against them
#[derive(Debug, Default)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Validate `parameters` against the tool's schema, then execute it
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| AgentError::ToolNotFound(function_name.to_string()))?;

        validate_parameters(tool, &parameters)?;
        tool.execute(parameters).await
    }

    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }
}

fn validate_parameters(tool: &dyn Tool, parameters: &Value) -> Result<()> {
    let schema = tool.parameters_schema();
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|err| {
            AgentError::Validation(format!(
                "Failed to prepare `{}` parameter schema: {}",
                tool.name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(parameters) {
        let mut details: Vec<String> = errors
            .take(MAX_SCHEMA_ERRORS + 1)
            .map(|error| {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "<root>".to_string() } else { path };
                format!("{}: {}", path, error)
            })
            .collect();

        if details.len() > MAX_SCHEMA_ERRORS {
            details.truncate(MAX_SCHEMA_ERRORS);
            details.push("additional errors truncated".to_string());
        }

        return Err(AgentError::Validation(format!(
            "Invalid arguments for `{}`: {}",
            tool.name(),
            details.join("; ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolFuture;
    use serde_json::json;

    #[derive(Debug)]
    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the query back"
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            })
        }

        fn execute(&self, parameters: Value) -> ToolFuture<'_> {
            Box::pin(async move { Ok(parameters["query"].clone()) })
        }
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let mut factory = FunctionFactory::new();
        factory.register_tool(EchoTool);

        let result = factory
            .execute_function("echo", json!({"query": "hello"}))
            .await
            .unwrap();
        assert_eq!(result, json!("hello"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let factory = FunctionFactory::new();
        let err = factory
            .execute_function("missing", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TOOL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_schema_violation_is_rejected_before_execution() {
        let mut factory = FunctionFactory::new();
        factory.register_tool(EchoTool);

        let err = factory
            .execute_function("echo", json!({"query": 7}))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Validation(ref message) if message.contains("/query")));
    }

    #[test]
    fn test_openai_tools_listing() {
        let mut factory = FunctionFactory::new();
        factory.register_tool(EchoTool);

        assert!(factory.has_function("echo"));
        let tools = factory.get_openai_tools();
        assert_eq!(tools[0]["function"]["name"], "echo");
        assert_eq!(factory.tool_names(), vec!["echo"]);
    }
}
