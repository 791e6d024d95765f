use tokio::sync::broadcast;
use tracing::debug;

/// Notifications for independently mounted listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    SubscriptionUpdated,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::LoggedIn => "logged-in",
            SessionEvent::LoggedOut => "logged-out",
            SessionEvent::SubscriptionUpdated => "subscription-updated",
        }
    }
}

/// Fan-out bus; any number of receivers, no payload beyond the kind.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Returns how many listeners received the event.
    pub fn emit(&self, event: SessionEvent) -> usize {
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(event = event.name(), delivered, "session event emitted");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_listener_sees_the_event() {
        let bus = EventBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.emit(SessionEvent::SubscriptionUpdated), 2);
        assert_eq!(a.recv().await.unwrap(), SessionEvent::SubscriptionUpdated);
        assert_eq!(b.recv().await.unwrap(), SessionEvent::SubscriptionUpdated);
    }

    #[test]
    fn emitting_without_listeners_is_fine() {
        assert_eq!(EventBus::default().emit(SessionEvent::LoggedOut), 0);
        assert_eq!(SessionEvent::SubscriptionUpdated.name(), "subscription-updated");
    }
}
