use super::{
    chat_client::ChatCompletionRequest,
    response_handler::{assistant_message, decode_actions, final_answer_tool_definition, thought_text},
};
use crate::{
    core::{
        action::AgentAction, agent::Agent, memory::AgentMemory, observer::StepObserver,
        steps::AgentStep, tool_call::ToolExecution,
    },
    error::{AgentError, Result},
    session::Transcript,
    types::result::{RunResult, TokenUsage},
};
use serde_json::json;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Record a step in memory and forward it to the observer
fn record(memory: &mut AgentMemory, observer: &StepObserver, step: AgentStep) {
    observer.emit(&step);
    memory.add_step(step);
}

impl Agent {
    /// Answer the last user turn of `transcript`, keeping every step taken
    pub async fn run_with_steps(
        &self,
        transcript: &Transcript,
        observer: &StepObserver,
    ) -> Result<RunResult> {
        let limit = self.run_timeout();
        timeout(limit, self.reasoning_loop(transcript, observer))
            .await
            .map_err(|_| {
                AgentError::Timeout(format!("agent run exceeded {}s", limit.as_secs_f64()))
            })?
    }

    async fn reasoning_loop(
        &self,
        transcript: &Transcript,
        observer: &StepObserver,
    ) -> Result<RunResult> {
        let start_time = Instant::now();
        let mut memory = AgentMemory::new(Some(self.system_prompt().to_string()))
            .with_history(transcript.as_messages());

        let mut tools = self.function_factory().get_openai_tools();
        tools.push(final_answer_tool_definition());

        let mut tokens: Option<TokenUsage> = None;
        let mut iteration = 0;

        while iteration < self.max_iterations() {
            iteration += 1;
            debug!(target: "search_chat::steps", iteration, "requesting next action");

            let request_body = ChatCompletionRequest::new(self.model(), memory.as_messages())
                .with_max_tokens(self.max_tokens())
                .with_tools(tools.clone())
                .with_tool_choice(json!("auto"))
                .into_value();

            let response = self.make_raw_request(&request_body).await?;

            if let Some(usage) = TokenUsage::from_response(&response) {
                tokens.get_or_insert_with(TokenUsage::default).add(&usage);
            }

            let message = assistant_message(&response)?;

            if let Some(content) = thought_text(message) {
                record(&mut memory, observer, AgentStep::Thought { content });
            }

            for action in decode_actions(message) {
                match action {
                    AgentAction::UseTool(call) => {
                        record(
                            &mut memory,
                            observer,
                            AgentStep::Action {
                                tool_name: call.name.clone(),
                                tool_call_id: call.id.clone(),
                                arguments: call.arguments.clone(),
                            },
                        );

                        let execution = ToolExecution::start(call.clone());
                        let output = match self
                            .function_factory()
                            .execute_function(&call.name, call.arguments)
                            .await
                        {
                            Ok(value) => execution.complete(value),
                            Err(err) => {
                                warn!(target: "search_chat::tools", tool = %call.name, error = %err, "tool failed");
                                execution.complete_with_error(&err)
                            }
                        };

                        debug!(
                            target: "search_chat::tools",
                            tool = %output.tool_name,
                            duration_ms = output.duration_ms as u64,
                            "tool finished"
                        );

                        record(
                            &mut memory,
                            observer,
                            AgentStep::Observation {
                                tool_call_id: output.tool_call_id,
                                tool_name: output.tool_name,
                                result: output.output,
                                is_error: output.is_error,
                            },
                        );
                    }
                    AgentAction::Fail(reason) => {
                        record(
                            &mut memory,
                            observer,
                            AgentStep::Correction { message: reason },
                        );
                    }
                    AgentAction::Answer(answer) => {
                        record(
                            &mut memory,
                            observer,
                            AgentStep::FinalAnswer {
                                answer: answer.clone(),
                            },
                        );

                        return Ok(RunResult::new(
                            answer,
                            memory.into_steps(),
                            tokens,
                            start_time.elapsed(),
                            iteration,
                        ));
                    }
                }
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations()))
    }
}
