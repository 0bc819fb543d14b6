use super::{credentials::Credentials, observer::StepObserver};
use crate::{error::Result, session::Transcript};
use async_trait::async_trait;

/// Something that turns a transcript into one assistant answer
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Produce the answer to the last user turn, reporting steps on `observer`
    async fn run(&self, transcript: &Transcript, observer: StepObserver) -> Result<String>;
}

/// Builds a reasoner for a single turn from the caller's credentials
pub trait ReasonerFactory: Send + Sync {
    fn build(&self, credentials: &Credentials) -> Result<Box<dyn Reasoner>>;
}
