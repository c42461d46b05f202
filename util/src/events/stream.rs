//! Per-connection bridge from the [`EventBus`] to a Server-Sent Events body.
//!
//! One [`EventStream`] exists per live admin connection. It is an explicit
//! state machine: on open it queues the acknowledgment frame and registers a
//! bus subscription; while open it forwards notifications as `data:` frames
//! and emits `: heartbeat <unix-ms>` comment frames whenever the connection
//! has been idle for the heartbeat period (intermediary proxies drop idle
//! connections otherwise); on close, whichever path gets there first, a
//! one-shot disposer releases the subscription exactly once. Dropping the
//! stream (client disconnect or a failed write, in which case axum drops the
//! response body) runs the same disposer.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::response::sse::Event;
use chrono::Utc;
use futures::Stream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::bus::{EventBus, SubscriptionId};
use super::notification::Notification;

pub struct EventStream {
    bus: EventBus,
    /// One-shot disposer state: `Some` while open, taken exactly once.
    subscription: Option<SubscriptionId>,
    rx: UnboundedReceiver<Notification>,
    heartbeat: Interval,
    greeting: Option<Notification>,
}

impl EventStream {
    /// Subscribes to `bus` and arms the heartbeat timer.
    ///
    /// The first frame yielded is always the `CONNECTION_ESTABLISHED`
    /// acknowledgment; the first heartbeat comes one full period later.
    pub fn open(bus: EventBus, heartbeat_period: Duration) -> Self {
        let (id, rx) = bus.subscribe();
        let mut heartbeat =
            tokio::time::interval_at(Instant::now() + heartbeat_period, heartbeat_period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            bus,
            subscription: Some(id),
            rx,
            heartbeat,
            greeting: Some(Notification::connection_established()),
        }
    }

    /// Releases the bus subscription. Safe to call from any close path; only
    /// the first call does anything.
    fn close(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.subscription.is_none()
    }

    fn data_frame(notification: &Notification) -> Event {
        match serde_json::to_string(notification) {
            Ok(json) => Event::default().data(json),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize notification; sending comment");
                Event::default().comment("unserializable event")
            }
        }
    }

    fn heartbeat_frame() -> Event {
        Event::default().comment(format!("heartbeat {}", Utc::now().timestamp_millis()))
    }
}

impl Stream for EventStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.is_closed() {
            return Poll::Ready(None);
        }

        if let Some(greeting) = this.greeting.take() {
            return Poll::Ready(Some(Ok(Self::data_frame(&greeting))));
        }

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(notification)) => {
                return Poll::Ready(Some(Ok(Self::data_frame(&notification))));
            }
            // Sender side gone (bus pruned us); terminate the response.
            Poll::Ready(None) => {
                this.close();
                return Poll::Ready(None);
            }
            Poll::Pending => {}
        }

        if this.heartbeat.poll_tick(cx).is_ready() {
            return Poll::Ready(Some(Ok(Self::heartbeat_frame())));
        }

        Poll::Pending
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    const HEARTBEAT: Duration = Duration::from_secs(15);

    #[tokio::test]
    async fn greeting_is_the_first_frame() {
        let bus = EventBus::new();
        let mut stream = EventStream::open(bus.clone(), HEARTBEAT);

        // Publish before polling; the acknowledgment must still come first.
        bus.publish(Notification::bulk_import_progress("students", 1, 1, 0));

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        // SSE events have no public accessors; compare the framed output.
        assert!(format!("{:?}", first).contains("CONNECTION_ESTABLISHED"));
        assert!(format!("{:?}", second).contains("BULK_IMPORT_PROGRESS"));
    }

    #[tokio::test]
    async fn forwards_published_notifications() {
        let bus = EventBus::new();
        let mut stream = EventStream::open(bus.clone(), HEARTBEAT);
        let _ = stream.next().await; // consume greeting

        bus.publish(Notification::class_ended("7", "Databases - CSE"));
        let frame = stream.next().await.unwrap().unwrap();
        assert!(format!("{:?}", frame).contains("CLASS_ENDED"));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_stream_emits_heartbeat_comments() {
        let bus = EventBus::new();
        let mut stream = EventStream::open(bus, HEARTBEAT);
        let _ = stream.next().await; // consume greeting

        // Paused time auto-advances to the next timer deadline.
        let frame = stream.next().await.unwrap().unwrap();
        assert!(format!("{:?}", frame).contains("heartbeat"));

        let frame = stream.next().await.unwrap().unwrap();
        assert!(format!("{:?}", frame).contains("heartbeat"));
    }

    #[tokio::test]
    async fn drop_unsubscribes_exactly_once() {
        let bus = EventBus::new();
        {
            let _stream = EventStream::open(bus.clone(), HEARTBEAT);
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn connect_disconnect_churn_leaves_no_subscriptions() {
        let bus = EventBus::new();
        for _ in 0..100 {
            let mut stream = EventStream::open(bus.clone(), HEARTBEAT);
            let _ = stream.next().await;
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn terminates_when_bus_drops_the_subscription() {
        let bus = EventBus::new();
        let mut stream = EventStream::open(bus.clone(), HEARTBEAT);
        let _ = stream.next().await; // greeting

        // Simulate the bus-side prune of this subscriber.
        bus.unsubscribe(0);
        assert!(stream.next().await.is_none());
        assert!(stream.is_closed());
    }
}
