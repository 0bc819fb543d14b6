pub mod action;
pub mod agent;
pub mod credentials;
pub mod factory;
pub mod memory;
pub mod observer;
pub mod reasoner;
pub mod steps;
pub mod tool_call;

pub use crate::types::result::{RunResult, TokenUsage};
pub use action::AgentAction;
pub use agent::{Agent, DEFAULT_SYSTEM_PROMPT};
pub use credentials::Credentials;
pub use factory::AgentFactory;
pub use memory::AgentMemory;
pub use observer::StepObserver;
pub use reasoner::{Reasoner, ReasonerFactory};
pub use steps::AgentStep;
pub use tool_call::{ToolCall, ToolExecution, ToolOutput};
