use tokio::sync::broadcast;
use tracing::debug;

/// Named in-process signals. Fire-and-forget, no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Week instances changed; instantiation should re-run.
    GoalsUpdated,
    /// Dream definitions changed; dependents should re-read dreams.
    DreamsUpdated,
}

impl Topic {
    pub fn name(self) -> &'static str {
        match self {
            Topic::GoalsUpdated => "goals-updated",
            Topic::DreamsUpdated => "dreams-updated",
        }
    }
}

/// Multi-subscriber broadcast of [`Topic`] signals.
///
/// Construct once and share clones; all clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Topic>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish a signal. Returns how many subscribers will see it.
    pub fn publish(&self, topic: Topic) -> usize {
        let delivered = self.tx.send(topic).unwrap_or(0);
        debug!(topic = topic.name(), subscribers = delivered, "event published");
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Topic> {
        self.tx.subscribe()
    }
}
