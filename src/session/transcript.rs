use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Greeting the assistant opens every session with
pub const GREETING: &str = "Hi, I am a chatbot that can search the web. How can I help you?";

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Chat-completions message for this turn
    pub fn to_message(&self) -> Value {
        json!({
            "role": self.role.as_str(),
            "content": self.content
        })
    }
}

/// Append-only, chronologically ordered history of turns for one session.
///
/// The only mutators are crate-private `push_*` methods, so callers outside the
/// session manager can read the history but never edit, reorder or drop a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// A transcript holding only the assistant greeting
    pub fn seeded() -> Self {
        Self::with_greeting(GREETING)
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false for a seeded transcript; kept for API completeness with `len`.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Convert to chat-completions messages in order
    pub fn as_messages(&self) -> Vec<Value> {
        self.turns.iter().map(Turn::to_message).collect()
    }

    pub(crate) fn push_user(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::user(content))
    }

    pub(crate) fn push_assistant(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::assistant(content))
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        // just pushed
        &self.turns[self.turns.len() - 1]
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_transcript() {
        let transcript = Transcript::seeded();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role(), Role::Assistant);
        assert_eq!(transcript.turns()[0].content(), GREETING);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::seeded();
        transcript.push_user("first");
        transcript.push_assistant("second");

        let roles: Vec<Role> = transcript.iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(transcript.last().map(Turn::content), Some("second"));
    }

    #[test]
    fn test_as_messages() {
        let mut transcript = Transcript::seeded();
        transcript.push_user("What is machine learning?");

        let messages = transcript.as_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "assistant");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "What is machine learning?");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = Turn::user("hi");
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "user");
    }
}
