//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that lets
//! many publishers (launch paths, relays, the monitoring loop, the signal
//! watcher) feed one log stream without blocking each other.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or fails; with no
//!   receivers the event is dropped.
//! - **Bounded capacity**: one ring buffer stores recent events for all
//!   receivers; slow receivers observe `RecvError::Lagged(n)` and skip the
//!   `n` oldest items.
//! - **No persistence**: events exist only in flight.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (internally an `Arc`-backed sender); every runner and
/// relay holds its own clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// Returns immediately; if nobody is subscribed the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn subscriber_sees_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::ShutdownRequested));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::ShutdownRequested);
    }

    #[tokio::test]
    async fn publish_without_receivers_is_a_noop() {
        let bus = Bus::new(8);
        bus.publish(Event::now(EventKind::AllStopped));
        // a receiver subscribed later only sees later events
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::AllServicesUp));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::AllServicesUp);
    }
}
