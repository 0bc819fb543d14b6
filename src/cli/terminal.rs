use crate::{
    session::{Presenter, Role, Transcript, Turn, INPUT_PLACEHOLDER},
    AgentError, AgentStep,
};
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;

const PROMPT: &str = "> ";

/// Line-oriented chat UI over any async reader and blocking writer.
///
/// Only turns that have not been printed yet are written when the transcript
/// is rendered again.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
    shown: usize,
}

impl TerminalPresenter<BufReader<Stdin>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            shown: 0,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = self.output.write_fmt(text).and_then(|_| self.output.flush()) {
            warn!("failed to write to terminal: {}", err);
        }
    }
}

#[async_trait]
impl<R, W> Presenter for TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn render_turn(&mut self, turn: &Turn) {
        let speaker = match turn.role() {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        self.write(format_args!("{}: {}\n\n", speaker, turn.content()));
    }

    fn render_transcript(&mut self, transcript: &Transcript) {
        let pending: Vec<Turn> = transcript.turns().iter().skip(self.shown).cloned().collect();
        for turn in &pending {
            self.render_turn(turn);
        }
        self.shown = transcript.len();
    }

    fn render_step(&mut self, step: &AgentStep) {
        // the final answer is printed as an assistant turn
        if matches!(step, AgentStep::FinalAnswer { .. }) {
            return;
        }
        self.write(format_args!("  {}\n", step.describe()));
    }

    fn render_error(&mut self, error: &AgentError) {
        self.write(format_args!("Error: {}\n", error));
        if error.is_credential_error() {
            self.write(format_args!("Check the Groq API key and try again.\n"));
        }
        self.write(format_args!("\n"));
    }

    async fn read_input(&mut self) -> Option<String> {
        self.write(format_args!("{}", PROMPT));
        if self.shown <= 1 {
            self.write(format_args!("(e.g. {}) ", INPUT_PLACEHOLDER));
        }

        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                warn!("failed to read input: {}", err);
                return None;
            }
        }

        let text = line.trim_end_matches(['\r', '\n']);
        match text.trim() {
            "/quit" | "/exit" => None,
            _ => Some(text.to_string()),
        }
    }
}
