//! A process-wide publish/subscribe register for admin notifications.
//!
//! Each subscriber owns the receiving half of an unbounded channel, so a
//! publish is a non-blocking send per subscriber and a slow or gone consumer
//! can never stall the publisher or affect its peers. The bus is an explicit
//! value owned by the application state, not a module-level singleton, so
//! tests can instantiate one per case.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::notification::Notification;

/// Opaque handle identifying one subscription.
pub type SubscriptionId = u64;

struct Subscriber {
    id: SubscriptionId,
    tx: mpsc::UnboundedSender<Notification>,
}

#[derive(Default)]
struct Registry {
    next_id: SubscriptionId,
    subscribers: Vec<Subscriber>,
}

/// Cloneable handle to the shared subscriber register.
///
/// Delivery is at-most-once and only to subscribers registered at the instant
/// of publish; subscribers added during a publish do not see the in-flight
/// event.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its handle plus the receiving
    /// end of its delivery channel.
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.inner.lock().expect("event bus lock poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push(Subscriber { id, tx });
        (id, rx)
    }

    /// Removes a subscription. Idempotent: unknown or already-removed handles
    /// are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = self.inner.lock().expect("event bus lock poisoned");
        registry.subscribers.retain(|s| s.id != id);
    }

    /// Delivers `notification` to every currently registered subscriber, in
    /// registration order.
    ///
    /// The subscriber list is snapshotted before delivery, so registration
    /// changes racing with a publish cannot skip or double-deliver. A failed
    /// send (receiver dropped) affects only that subscriber, which is pruned.
    pub fn publish(&self, notification: Notification) {
        let snapshot: Vec<(SubscriptionId, mpsc::UnboundedSender<Notification>)> = {
            let registry = self.inner.lock().expect("event bus lock poisoned");
            registry
                .subscribers
                .iter()
                .map(|s| (s.id, s.tx.clone()))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            if tx.send(notification.clone()).is_err() {
                tracing::debug!(subscription = id, "dropping gone event subscriber");
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut registry = self.inner.lock().expect("event bus lock poisoned");
            registry.subscribers.retain(|s| !dead.contains(&s.id));
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .expect("event bus lock poisoned")
            .subscribers
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let (_a, mut rx_a) = bus.subscribe();
        let (_b, mut rx_b) = bus.subscribe();

        bus.publish(Notification::connection_established());

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(Notification::connection_established());
    }

    #[tokio::test]
    async fn gone_subscriber_does_not_affect_the_others() {
        let bus = EventBus::new();
        let (_a, mut rx_a) = bus.subscribe();
        let (_b, rx_b) = bus.subscribe();
        let (_c, mut rx_c) = bus.subscribe();

        // Middle subscriber is gone; delivery to it fails on send.
        drop(rx_b);

        bus.publish(Notification::bulk_import_progress("students", 1, 10, 0));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_c.try_recv().is_ok());
        // The dead subscriber was pruned during publish.
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let (a, _rx_a) = bus.subscribe();
        let (_b, mut rx_b) = bus.subscribe();

        bus.unsubscribe(a);
        bus.unsubscribe(a);

        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(Notification::connection_established());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn late_subscriber_does_not_receive_earlier_events() {
        let bus = EventBus::new();
        bus.publish(Notification::connection_established());

        let (_id, mut rx) = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::new();
        let (_id, mut rx) = bus.subscribe();

        for processed in 1..=5u64 {
            bus.publish(Notification::bulk_import_progress("students", processed, 5, 0));
        }

        let mut last = 0;
        for _ in 0..5 {
            let n = rx.try_recv().unwrap();
            let processed = n.payload["processed"].as_u64().unwrap();
            assert!(processed > last);
            last = processed;
        }
    }
}
