use std::sync::mpsc::{channel, Receiver, Sender};

/// Tour lifecycle notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    TourStarted,
    /// The manager advanced past the step at `step_index`.
    StepFinished { step_index: usize },
    TourFinished,
}

/// Channel-based event fan-out. Dropping the receiver ends the subscription;
/// dead senders are pruned on the next emit.
#[derive(Default)]
pub struct TourEvents {
    subscribers: Vec<Sender<TourEvent>>,
}

impl TourEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<TourEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: TourEvent) {
        tracing::debug!(?event, "tour event");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
