use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a single step in the agent's reasoning process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStep {
    /// Free-text reasoning the model attached to its tool calls
    Thought { content: String },
    /// Action step where the agent calls a tool
    Action {
        tool_name: String,
        tool_call_id: String,
        arguments: Value,
    },
    /// Observation step capturing the result of a tool execution
    Observation {
        tool_call_id: String,
        tool_name: String,
        result: String,
        is_error: bool,
    },
    /// Recovery note sent back to the model after malformed output
    Correction { message: String },
    /// Final answer from the agent
    FinalAnswer { answer: String },
}

impl AgentStep {
    /// Convert step to chat-completions message format
    pub fn to_message(&self) -> Value {
        match self {
            AgentStep::Thought { content } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": content
                })
            }
            AgentStep::Action {
                tool_name,
                tool_call_id,
                arguments,
            } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": tool_call_id,
                        "type": "function",
                        "function": {
                            "name": tool_name,
                            "arguments": arguments.to_string()
                        }
                    }]
                })
            }
            AgentStep::Observation {
                tool_call_id,
                result,
                ..
            } => {
                serde_json::json!({
                    "role": "tool",
                    "tool_call_id": tool_call_id,
                    "content": result
                })
            }
            AgentStep::Correction { message } => {
                serde_json::json!({
                    "role": "system",
                    "content": message
                })
            }
            AgentStep::FinalAnswer { answer } => {
                serde_json::json!({
                    "role": "assistant",
                    "content": answer
                })
            }
        }
    }

    /// Get a human-readable description of the step
    pub fn describe(&self) -> String {
        match self {
            AgentStep::Thought { content } => format!("💭 Thought: {}", content),
            AgentStep::Action {
                tool_name,
                arguments,
                ..
            } => format!("🔧 Action: {}({})", tool_name, arguments),
            AgentStep::Observation {
                tool_name,
                result,
                is_error,
                ..
            } => {
                if *is_error {
                    format!("❌ Error from {}: {}", tool_name, result)
                } else {
                    format!("👁 Observation from {}: {}", tool_name, result)
                }
            }
            AgentStep::Correction { message } => format!("⚠️ Correction: {}", message),
            AgentStep::FinalAnswer { answer } => format!("✅ Final Answer: {}", answer),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AgentStep::Observation { is_error: true, .. } | AgentStep::Correction { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_message_encodes_arguments_as_string() {
        let step = AgentStep::Action {
            tool_name: "wikipedia".to_string(),
            tool_call_id: "call_1".to_string(),
            arguments: json!({"query": "Rust"}),
        };

        let message = step.to_message();
        assert_eq!(message["role"], "assistant");
        assert_eq!(message["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            message["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"Rust\"}"
        );
    }

    #[test]
    fn test_observation_message() {
        let step = AgentStep::Observation {
            tool_call_id: "call_1".to_string(),
            tool_name: "arxiv".to_string(),
            result: "Title: Attention".to_string(),
            is_error: false,
        };

        let message = step.to_message();
        assert_eq!(message["role"], "tool");
        assert_eq!(message["tool_call_id"], "call_1");
        assert!(!step.is_error());
    }

    #[test]
    fn test_describe_error_observation() {
        let step = AgentStep::Observation {
            tool_call_id: "call_2".to_string(),
            tool_name: "search".to_string(),
            result: "timed out".to_string(),
            is_error: true,
        };
        assert!(step.describe().starts_with("❌"));
        assert!(step.is_error());
    }
}
