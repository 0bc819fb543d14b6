use crate::{
    core::{action::AgentAction, tool_call::ToolCall},
    error::{AgentError, Result},
};
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) const FINAL_ANSWER_TOOL: &str = "final_answer";

/// Arguments for the final_answer tool
#[derive(Deserialize)]
struct FinalAnswerArguments {
    answer: String,
}

/// Tool definition the model calls to finish a run
pub(crate) fn final_answer_tool_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": FINAL_ANSWER_TOOL,
            "description": "Signal that you have finished by giving the final answer to the user.",
            "parameters": {
                "type": "object",
                "properties": {
                    "answer": {
                        "type": "string",
                        "description": "Final response for the user"
                    }
                },
                "required": ["answer"]
            }
        }
    })
}

/// Pull the assistant message out of a chat-completions response
pub(crate) fn assistant_message(response: &Value) -> Result<&Value> {
    let choices = response
        .get("choices")
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            AgentError::Unknown("Missing 'choices' array in completion response".to_string())
        })?;

    let first_choice = choices.first().ok_or_else(|| {
        AgentError::Unknown("Completion response contained no choices".to_string())
    })?;

    first_choice.get("message").ok_or_else(|| {
        AgentError::Unknown("Completion response missing assistant message".to_string())
    })
}

/// Text the model sent alongside tool calls, if any
pub(crate) fn thought_text(message: &Value) -> Option<String> {
    tool_calls(message)?;
    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Decode an assistant message into the actions it asks for.
///
/// Plain text with no tool calls is taken as the answer. Anything malformed
/// becomes `Fail` so the loop can ask the model to try again.
pub(crate) fn decode_actions(message: &Value) -> Vec<AgentAction> {
    let Some(calls) = tool_calls(message) else {
        let content = message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();

        let action = if content.is_empty() {
            AgentAction::Fail(
                "Reminder: the response was empty. Call one of the tools or call `final_answer` with the answer.".to_string(),
            )
        } else {
            AgentAction::Answer(content.to_string())
        };
        return vec![action];
    };

    let exclusive = calls.len() == 1;
    calls
        .iter()
        .enumerate()
        .map(|(idx, call)| decode_tool_call(idx, call, exclusive))
        .collect()
}

fn tool_calls(message: &Value) -> Option<&Vec<Value>> {
    message
        .get("tool_calls")
        .and_then(Value::as_array)
        .filter(|calls| !calls.is_empty())
}

fn decode_tool_call(idx: usize, call: &Value, exclusive: bool) -> AgentAction {
    let id = call
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("call_{idx}"));

    let Some(function) = call.get("function") else {
        return AgentAction::Fail(format!("Tool call `{id}` is missing its function"));
    };

    let name = match function.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name,
        _ => return AgentAction::Fail(format!("Tool call `{id}` is missing a function name")),
    };

    let arguments_str = function
        .get("arguments")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .unwrap_or("{}");

    if name == FINAL_ANSWER_TOOL {
        if !exclusive {
            return AgentAction::Fail(
                "`final_answer` must be the only tool call in a single turn".to_string(),
            );
        }

        return match serde_json::from_str::<FinalAnswerArguments>(arguments_str) {
            Ok(args) if !args.answer.trim().is_empty() => {
                AgentAction::Answer(args.answer.trim().to_string())
            }
            Ok(_) => AgentAction::Fail(
                "final_answer requires a non-empty `answer` field".to_string(),
            ),
            Err(err) => AgentAction::Fail(format!("Invalid final_answer arguments: {}", err)),
        };
    }

    match serde_json::from_str::<Value>(arguments_str) {
        Ok(arguments) => AgentAction::UseTool(ToolCall::new(id, name, arguments)),
        Err(err) => AgentAction::Fail(format!(
            "Failed to parse arguments for tool '{}': {}",
            name, err
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, name: &str, arguments: &str) -> Value {
        json!({
            "id": id,
            "type": "function",
            "function": {"name": name, "arguments": arguments}
        })
    }

    #[test]
    fn test_plain_content_is_answer() {
        let message = json!({"role": "assistant", "content": "  ML is a field of AI. "});
        assert_eq!(
            decode_actions(&message),
            vec![AgentAction::Answer("ML is a field of AI.".to_string())]
        );
    }

    #[test]
    fn test_empty_content_fails() {
        let message = json!({"role": "assistant", "content": null});
        let actions = decode_actions(&message);
        assert!(matches!(actions.as_slice(), [AgentAction::Fail(_)]));
    }

    #[test]
    fn test_tool_call_decodes_arguments() {
        let message = json!({
            "role": "assistant",
            "tool_calls": [call("call_1", "wikipedia", "{\"query\":\"Rust\"}")]
        });

        let actions = decode_actions(&message);
        assert_eq!(
            actions,
            vec![AgentAction::UseTool(ToolCall::new(
                "call_1",
                "wikipedia",
                json!({"query": "Rust"})
            ))]
        );
    }

    #[test]
    fn test_final_answer_call() {
        let message = json!({
            "role": "assistant",
            "tool_calls": [call("call_9", "final_answer", "{\"answer\":\"42\"}")]
        });
        assert_eq!(
            decode_actions(&message),
            vec![AgentAction::Answer("42".to_string())]
        );
    }

    #[test]
    fn test_final_answer_mixed_with_tools_fails_only_that_call() {
        let message = json!({
            "role": "assistant",
            "tool_calls": [
                call("call_1", "arxiv", "{\"query\":\"transformers\"}"),
                call("call_2", "final_answer", "{\"answer\":\"done\"}")
            ]
        });

        let actions = decode_actions(&message);
        assert!(matches!(actions[0], AgentAction::UseTool(_)));
        assert!(matches!(actions[1], AgentAction::Fail(_)));
    }

    #[test]
    fn test_malformed_arguments_fail() {
        let message = json!({
            "role": "assistant",
            "tool_calls": [call("call_1", "search", "{not json")]
        });
        let actions = decode_actions(&message);
        assert!(
            matches!(&actions[0], AgentAction::Fail(reason) if reason.contains("search"))
        );
    }

    #[test]
    fn test_thought_text_only_with_tool_calls() {
        let with_calls = json!({
            "content": "Let me check Wikipedia.",
            "tool_calls": [call("call_1", "wikipedia", "{}")]
        });
        let plain = json!({"content": "Just an answer"});

        assert_eq!(
            thought_text(&with_calls).as_deref(),
            Some("Let me check Wikipedia.")
        );
        assert!(thought_text(&plain).is_none());
    }

    #[test]
    fn test_assistant_message_requires_choices() {
        assert!(assistant_message(&json!({})).is_err());
        assert!(assistant_message(&json!({"choices": []})).is_err());
        let response = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(assistant_message(&response).unwrap()["content"], "hi");
    }
}
