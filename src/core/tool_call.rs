use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// A tool invocation the model asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier the model assigned to this call
    pub id: String,
    /// Name of the tool to execute
    pub name: String,
    /// Decoded JSON arguments
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a human-readable description
    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.arguments)
    }
}

/// Result of running one tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub tool_name: String,
    /// Text handed back to the model
    pub output: String,
    pub is_error: bool,
    /// Execution duration in milliseconds
    pub duration_ms: u128,
}

/// Tracks the execution of a tool call with timing information
#[derive(Debug)]
pub struct ToolExecution {
    pub tool_call: ToolCall,
    start_time: Instant,
}

impl ToolExecution {
    /// Start tracking a tool execution
    pub fn start(tool_call: ToolCall) -> Self {
        Self {
            tool_call,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Complete the execution with the tool's result value
    pub fn complete(self, output: Value) -> ToolOutput {
        let text = match output {
            Value::String(text) => text,
            other => other.to_string(),
        };
        self.finish(text, false)
    }

    /// Complete with an error payload
    pub fn complete_with_error(self, error: &crate::AgentError) -> ToolOutput {
        let payload = error.to_error_payload().to_string();
        self.finish(payload, true)
    }

    fn finish(self, output: String, is_error: bool) -> ToolOutput {
        let duration = self.start_time.elapsed();
        ToolOutput {
            tool_call_id: self.tool_call.id,
            tool_name: self.tool_call.name,
            output,
            is_error,
            duration_ms: duration.as_millis(),
        }
    }
}
