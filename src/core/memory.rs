use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Working memory for a single reasoning run.
///
/// Holds the system prompt, the prior conversation the run was started from,
/// and the steps the run has taken so far. Converts all of it to chat messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMemory {
    system_prompt: Option<String>,
    history: Vec<Value>,
    steps: Vec<AgentStep>,
}

impl AgentMemory {
    /// Create a new memory with optional system prompt
    pub fn new(system_prompt: Option<String>) -> Self {
        Self {
            system_prompt,
            history: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Seed with conversation messages that precede this run
    pub fn with_history(mut self, history: Vec<Value>) -> Self {
        self.history = history;
        self
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        info!(target: "search_chat::steps", "{}", step.describe());
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn last_step(&self) -> Option<&AgentStep> {
        self.steps.last()
    }

    pub fn into_steps(self) -> Vec<AgentStep> {
        self.steps
    }

    /// System prompt, then history, then this run's steps
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::with_capacity(1 + self.history.len() + self.steps.len());

        if let Some(system_prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        messages.extend(self.history.iter().cloned());
        messages.extend(self.steps.iter().map(AgentStep::to_message));

        messages
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if no steps were taken yet (history and prompt excluded)
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn count_actions(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Action { .. }))
            .count()
    }

    pub fn count_corrections(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Correction { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_creation() {
        let memory = AgentMemory::new(Some("System".to_string()));
        assert_eq!(memory.step_count(), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_as_messages_orders_prompt_history_steps() {
        let history = vec![
            json!({"role": "assistant", "content": "Hi"}),
            json!({"role": "user", "content": "What is Rust?"}),
        ];
        let mut memory = AgentMemory::new(Some("System".to_string())).with_history(history);
        memory.add_step(AgentStep::Correction {
            message: "call a tool".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "What is Rust?");
        assert_eq!(messages[3]["content"], "call a tool");
    }

    #[test]
    fn test_counts() {
        let mut memory = AgentMemory::new(None);
        memory.add_step(AgentStep::Action {
            tool_name: "wikipedia".to_string(),
            tool_call_id: "1".to_string(),
            arguments: Value::Null,
        });
        memory.add_step(AgentStep::Correction {
            message: "retry".to_string(),
        });
        assert_eq!(memory.count_actions(), 1);
        assert_eq!(memory.count_corrections(), 1);
        assert!(matches!(
            memory.last_step(),
            Some(AgentStep::Correction { .. })
        ));
    }
}
