//! search-chat: a terminal chat session backed by a tool-calling agent
//!
//! Each user turn is handed to a reasoning agent that can look things up on
//! Wikipedia, arXiv and the web before answering. The session keeps an
//! append-only transcript, streams the agent's intermediate steps while a turn
//! is in flight, and surfaces failures without losing the user's message.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use search_chat::{AgentFactory, ChatConfig, Credentials, EventOutcome, Session};
//! use search_chat::cli::TerminalPresenter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChatConfig::from_env()?;
//!     let credentials = Credentials::from_env();
//!     let mut session = Session::new(AgentFactory::new(config));
//!     let mut presenter = TerminalPresenter::stdio();
//!
//!     let outcome = session
//!         .process_event(Some("What is machine learning?".into()), &credentials, &mut presenter)
//!         .await;
//!     if let EventOutcome::Answered(turn) = outcome {
//!         println!("{}", turn.content());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub(crate) mod services;
pub mod session;
pub mod tools;
pub mod types;

pub use config::{ChatConfig, ToolEndpoints};
pub use core::{
    Agent, AgentAction, AgentFactory, AgentMemory, AgentStep, Credentials, Reasoner,
    ReasonerFactory, RunResult, StepObserver, TokenUsage, ToolCall, ToolExecution, ToolOutput,
};
pub use error::{AgentError, Result};
pub use session::{EventOutcome, Presenter, Role, Session, SessionState, Transcript, Turn};
pub use tools::{FunctionFactory, Tool};

#[cfg(feature = "cli")]
pub mod cli;
