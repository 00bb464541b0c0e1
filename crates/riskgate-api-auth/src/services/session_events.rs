//! Session lifecycle event stream.
//!
//! Auth handlers publish an event whenever a session is created, refreshed,
//! or revoked. The application subscribes once at startup and logs the
//! stream; the subscription is dropped at shutdown. Publishing is
//! fire-and-forget: a lagging or absent subscriber never blocks a handler.

use riskgate_core::UserId;
use tokio::sync::broadcast;

/// Default event channel capacity.
const CHANNEL_CAPACITY: usize = 256;

/// A session lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user completed authentication and received tokens.
    SignedIn { user_id: UserId },
    /// A session's tokens were rotated.
    Refreshed { user_id: UserId },
    /// A session was revoked by logout.
    SignedOut { user_id: UserId },
}

impl SessionEvent {
    /// The user the event concerns.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            SessionEvent::SignedIn { user_id }
            | SessionEvent::Refreshed { user_id }
            | SessionEvent::SignedOut { user_id } => *user_id,
        }
    }
}

/// Broadcast publisher for session events.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a new event stream.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to the stream. Call once at application start.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Silently drops the event if no subscriber exists.
    pub fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!("No session event subscribers: {e}");
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        let user_id = UserId::new();
        events.publish(SessionEvent::SignedIn { user_id });

        let received = rx.recv().await.unwrap();
        assert_eq!(received, SessionEvent::SignedIn { user_id });
        assert_eq!(received.user_id(), user_id);
    }

    #[tokio::test]
    async fn test_publish_without_subscriber_does_not_panic() {
        let events = SessionEvents::new();
        events.publish(SessionEvent::SignedOut {
            user_id: UserId::new(),
        });
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let events = SessionEvents::new();
        let rx = events.subscribe();
        drop(rx);

        // Sends after teardown are dropped, not surfaced to the caller.
        events.publish(SessionEvent::Refreshed {
            user_id: UserId::new(),
        });
    }
}
