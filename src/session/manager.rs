use super::{
    presenter::Presenter,
    state::SessionState,
    transcript::{Transcript, Turn},
};
use crate::{
    core::{credentials::Credentials, observer::StepObserver, reasoner::ReasonerFactory},
    error::Result,
};
use tracing::{debug, error, info};

/// What one input event amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Empty or absent input; nothing happened
    Ignored,
    Answered(Turn),
    /// The turn failed; the message was shown to the user
    Failed(String),
}

/// One interactive conversation.
///
/// Owns the transcript for its whole lifetime and drives exactly one
/// request/response cycle per input event.
pub struct Session {
    transcript: Option<Transcript>,
    state: SessionState,
    factory: Box<dyn ReasonerFactory>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("transcript", &self.transcript)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(factory: impl ReasonerFactory + 'static) -> Self {
        Self {
            transcript: None,
            state: SessionState::Idle,
            factory: Box::new(factory),
        }
    }

    /// Seed the transcript with the greeting; later calls return it untouched
    pub fn initialize_session(&mut self) -> &Transcript {
        self.transcript.get_or_insert_with(|| {
            info!(target: "search_chat::session", "session initialized");
            Transcript::seeded()
        })
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Show the whole transcript in order
    pub fn render(&self, presenter: &mut dyn Presenter) {
        if let Some(transcript) = &self.transcript {
            presenter.render_transcript(transcript);
        }
    }

    /// Append a user turn; empty or whitespace-only text is not an event
    pub fn submit_user_turn(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            debug!(target: "search_chat::session", "ignoring empty input");
            return false;
        }

        self.initialize_session();
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.push_user(text);
        }
        true
    }

    /// Delegate the pending user turn to a freshly built reasoner.
    ///
    /// Success appends the assistant turn and re-renders. Failure is shown on
    /// the presenter and leaves the transcript as it was.
    pub async fn handle_turn(
        &mut self,
        credentials: &Credentials,
        presenter: &mut dyn Presenter,
    ) -> Result<Turn> {
        let reasoner = match self.factory.build(credentials) {
            Ok(reasoner) => reasoner,
            Err(err) => {
                error!(target: "search_chat::session", error = %err, "could not build reasoner");
                presenter.render_error(&err);
                return Err(err);
            }
        };

        let (observer, mut steps) = StepObserver::channel();
        let result = {
            let transcript: &Transcript = self.transcript.get_or_insert_with(Transcript::seeded);
            let mut run = reasoner.run(transcript, observer);

            loop {
                tokio::select! {
                    biased;
                    Some(step) = steps.recv() => presenter.render_step(&step),
                    result = &mut run => break result,
                }
            }
        };

        while let Ok(step) = steps.try_recv() {
            presenter.render_step(&step);
        }

        match result {
            Ok(answer) => {
                let turn = match self.transcript.as_mut() {
                    Some(transcript) => transcript.push_assistant(answer).clone(),
                    None => Turn::assistant(answer),
                };
                self.render(presenter);
                Ok(turn)
            }
            Err(err) => {
                error!(target: "search_chat::session", error = %err, "turn failed");
                presenter.render_error(&err);
                Err(err)
            }
        }
    }

    /// Run one input event through the state machine
    pub async fn process_event(
        &mut self,
        input: Option<String>,
        credentials: &Credentials,
        presenter: &mut dyn Presenter,
    ) -> EventOutcome {
        self.initialize_session();
        if self.state == SessionState::Idle {
            self.transition(SessionState::AwaitingInput);
        }

        let text = input.unwrap_or_default();
        if !self.submit_user_turn(&text) {
            self.transition(SessionState::Idle);
            return EventOutcome::Ignored;
        }
        self.transition(SessionState::InputReceived);
        self.render(presenter);

        self.transition(SessionState::DelegatingToAgent);
        let outcome = match self.handle_turn(credentials, presenter).await {
            Ok(turn) => {
                self.transition(SessionState::Success);
                EventOutcome::Answered(turn)
            }
            Err(err) => {
                self.transition(SessionState::Failure);
                EventOutcome::Failed(err.to_string())
            }
        };

        self.transition(SessionState::Idle);
        outcome
    }

    /// Render, wait for input, handle it; until the presenter runs out of input
    pub async fn run(&mut self, credentials: &Credentials, presenter: &mut dyn Presenter) {
        self.initialize_session();

        loop {
            self.render(presenter);
            if self.state == SessionState::Idle {
                self.transition(SessionState::AwaitingInput);
            }

            let Some(input) = presenter.read_input().await else {
                self.transition(SessionState::Idle);
                break;
            };

            self.process_event(Some(input), credentials, presenter).await;
        }

        info!(target: "search_chat::session", turns = self.transcript.as_ref().map(Transcript::len).unwrap_or(0), "session ended");
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {} -> {}",
            self.state,
            next
        );
        debug!(target: "search_chat::session", from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}
