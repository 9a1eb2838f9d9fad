//! Fan-out of notifications to external subscribers.
//!
//! Subscribers either hold a broadcast receiver (async consumers such as the
//! oracle processes) or register a synchronous sink that sees every
//! notification in emission order.

use crate::events::notification::{Notification, SuretyEvent};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Synchronous consumer of notifications.
pub trait EventSubscriber: Send + Sync {
    /// Subscriber name, for logs.
    fn name(&self) -> &str;

    /// Handle one notification.
    fn on_notification(&self, notification: &Notification);
}

/// Logs every notification through `tracing`.
#[derive(Clone, Debug, Default)]
pub struct TracingSubscriber;

impl EventSubscriber for TracingSubscriber {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_notification(&self, notification: &Notification) {
        match &notification.event {
            SuretyEvent::OracleRequest {
                index,
                airline,
                flight,
                timestamp,
            } => {
                tracing::info!(index, %airline, %flight, timestamp, "oracle request");
            }
            SuretyEvent::OracleReport {
                airline,
                flight,
                timestamp,
                status,
            } => {
                tracing::info!(%airline, %flight, timestamp, %status, "oracle report");
            }
            SuretyEvent::FlightStatusInfo {
                airline,
                flight,
                timestamp,
                status,
            } => {
                tracing::info!(%airline, %flight, timestamp, %status, "flight status consensus");
            }
        }
    }
}

/// Event notifier.
pub struct EventNotifier {
    sender: broadcast::Sender<Notification>,
    subscribers: Vec<Arc<dyn EventSubscriber>>,
    emitted: u64,
}

impl EventNotifier {
    /// Create a notifier buffering up to `capacity` notifications per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscribers: Vec::new(),
            emitted: 0,
        }
    }

    /// Subscribe to all notifications emitted from now on.
    ///
    /// Receivers that fall more than `capacity` behind lose the oldest ones.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Register a synchronous subscriber.
    pub fn add_subscriber(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        tracing::debug!(subscriber = subscriber.name(), "event subscriber added");
        self.subscribers.push(subscriber);
    }

    /// Emit an event to every subscriber.
    pub fn emit(&mut self, event: SuretyEvent) -> Notification {
        let notification = Notification::new(event);
        self.emitted += 1;

        for subscriber in &self.subscribers {
            subscriber.on_notification(&notification);
        }

        // Sending with no live receivers is not an error.
        let receivers = self.sender.send(notification.clone()).unwrap_or(0);
        tracing::trace!(event = notification.event.name(), receivers, "notification emitted");

        notification
    }

    /// Total notifications emitted.
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }

    /// Number of live broadcast receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventNotifier {
    fn default() -> Self {
        Self::new(crate::config::EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{RequestKey, StatusCode};
    use crate::core::Identity;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl EventSubscriber for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn on_notification(&self, notification: &Notification) {
            self.seen
                .lock()
                .unwrap()
                .push(notification.event.name().to_string());
        }
    }

    fn key() -> RequestKey {
        RequestKey::new(2, Identity::from_label("AIR1"), "FL100", 1_700_000_000)
    }

    #[test]
    fn test_emit_without_receivers() {
        let mut notifier = EventNotifier::new(4);
        notifier.emit(SuretyEvent::oracle_request(&key()));
        assert_eq!(notifier.emitted_count(), 1);
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[test]
    fn test_sync_subscribers_see_events_in_order() {
        let mut notifier = EventNotifier::default();
        let recorder = Arc::new(Recorder::default());
        notifier.add_subscriber(recorder.clone());
        notifier.add_subscriber(Arc::new(TracingSubscriber));

        notifier.emit(SuretyEvent::oracle_request(&key()));
        notifier.emit(SuretyEvent::oracle_report(&key(), StatusCode::OnTime));
        notifier.emit(SuretyEvent::flight_status_info(&key(), StatusCode::OnTime));

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec!["OracleRequest", "OracleReport", "FlightStatusInfo"]
        );
    }

    #[tokio::test]
    async fn test_broadcast_fan_out() {
        let mut notifier = EventNotifier::new(8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        let sent = notifier.emit(SuretyEvent::oracle_request(&key()));

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a.id, sent.id);
        assert_eq!(b.event, sent.event);
    }

    #[tokio::test]
    async fn test_lagging_receiver_loses_oldest() {
        let mut notifier = EventNotifier::new(2);
        let mut receiver = notifier.subscribe();

        for _ in 0..3 {
            notifier.emit(SuretyEvent::oracle_request(&key()));
        }

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert!(receiver.recv().await.is_ok());
    }
}
