use serde::Serialize;

/// Where the session is within the handling of one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Transcript stable, no pending event
    Idle,
    /// Rendered, waiting on the next input event
    AwaitingInput,
    /// Non-empty text arrived and was appended as a user turn
    InputReceived,
    /// Reasoning call in flight
    DelegatingToAgent,
    Success,
    Failure,
}

impl SessionState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Idle, AwaitingInput)
                | (AwaitingInput, InputReceived)
                | (AwaitingInput, Idle)
                | (InputReceived, DelegatingToAgent)
                | (DelegatingToAgent, Success)
                | (DelegatingToAgent, Failure)
                | (Success, Idle)
                | (Failure, Idle)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Success | SessionState::Failure)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingInput => "awaiting_input",
            SessionState::InputReceived => "input_received",
            SessionState::DelegatingToAgent => "delegating_to_agent",
            SessionState::Success => "success",
            SessionState::Failure => "failure",
        };
        f.write_str(name)
    }
}
