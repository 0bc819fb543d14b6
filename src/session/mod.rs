//! The conversation session: transcript, state machine and presentation seam

pub mod manager;
pub mod presenter;
pub mod state;
pub mod transcript;

pub use manager::{EventOutcome, Session};
pub use presenter::{Presenter, INPUT_PLACEHOLDER};
pub use state::SessionState;
pub use transcript::{Role, Transcript, Turn, GREETING};
