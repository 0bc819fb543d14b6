use super::transcript::{Transcript, Turn};
use crate::{core::steps::AgentStep, error::AgentError};
use async_trait::async_trait;

/// Placeholder shown in the input field while it is empty
pub const INPUT_PLACEHOLDER: &str = "What is machine learning?";

/// The user-facing side of a session: shows turns, progress and errors, and
/// supplies input.
#[async_trait]
pub trait Presenter: Send {
    fn render_turn(&mut self, turn: &Turn);

    /// Show every turn in order
    fn render_transcript(&mut self, transcript: &Transcript) {
        for turn in transcript {
            self.render_turn(turn);
        }
    }

    /// Show an intermediate reasoning step while a turn is in flight
    fn render_step(&mut self, step: &AgentStep);

    fn render_error(&mut self, error: &AgentError);

    /// Next line of input; `None` once input is exhausted
    async fn read_input(&mut self) -> Option<String>;
}
