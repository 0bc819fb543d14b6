use super::steps::AgentStep;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// Sending half of the progress channel a reasoning run reports its steps on.
///
/// Steps arrive on the receiver in the order they were emitted. A detached
/// observer discards everything.
#[derive(Debug, Clone, Default)]
pub struct StepObserver {
    sender: Option<UnboundedSender<AgentStep>>,
}

impl StepObserver {
    /// Create an observer and the receiver its steps arrive on
    pub fn channel() -> (Self, UnboundedReceiver<AgentStep>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn emit(&self, step: &AgentStep) {
        let Some(sender) = &self.sender else {
            return;
        };

        if sender.send(step.clone()).is_err() {
            trace!(target: "search_chat::steps", "step receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_steps_arrive_in_order() {
        let (observer, mut receiver) = StepObserver::channel();
        observer.emit(&AgentStep::Thought {
            content: "look it up".to_string(),
        });
        observer.emit(&AgentStep::FinalAnswer {
            answer: "done".to_string(),
        });
        drop(observer);

        assert!(matches!(
            receiver.recv().await,
            Some(AgentStep::Thought { .. })
        ));
        assert!(matches!(
            receiver.recv().await,
            Some(AgentStep::FinalAnswer { .. })
        ));
        assert!(receiver.recv().await.is_none());
    }

    #[test]
    fn test_detached_observer_ignores_steps() {
        let observer = StepObserver::detached();
        observer.emit(&AgentStep::Correction {
            message: "ignored".to_string(),
        });
    }
}
