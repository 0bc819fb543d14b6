use super::tool_call::ToolCall;

/// One decision decoded from a model response.
///
/// The reasoning loop is a state machine over these: `UseTool` runs a tool and
/// keeps going, `Answer` ends the run, `Fail` feeds a correction back to the
/// model and keeps going until the iteration budget runs out.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentAction {
    UseTool(ToolCall),
    Answer(String),
    Fail(String),
}

impl AgentAction {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentAction::Answer(_))
    }
}
