//! Fans match events out to every configured channel.
//!
//! Each channel is delivered to independently: a failing or slow channel
//! never blocks or cancels the others. Delivery errors are logged at debug
//! level and dropped, never retried.

use std::sync::Arc;
use std::time::Instant;

use feedhook_core::{Item, MatchOutcome};
use tokio::task::JoinHandle;

use crate::traits::{DispatchResult, MatchEvent, Notifier};

/// Dispatches match events to a fixed set of channels.
///
/// A dispatcher is built from one config snapshot and replaced wholesale
/// on reload.
#[derive(Clone, Default)]
pub struct Dispatcher {
    channels: Vec<Arc<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher over the given channels.
    pub fn new(channels: Vec<Arc<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.channel_name()).collect()
    }

    /// Fire-and-forget delivery of one match to every channel.
    ///
    /// Spawns one task per channel on the current tokio runtime and returns
    /// without waiting. The handles are returned for callers that want to
    /// observe completion; dropping them does not cancel delivery.
    pub fn dispatch(&self, item: Item, outcome: MatchOutcome) -> Vec<JoinHandle<DispatchResult>> {
        if self.channels.is_empty() {
            tracing::debug!(item_id = %item.id, "No notification channels configured");
            return Vec::new();
        }

        let event = Arc::new(MatchEvent::new(item, outcome));
        self.channels
            .iter()
            .map(|channel| {
                let channel = Arc::clone(channel);
                let event = Arc::clone(&event);
                tokio::spawn(async move { deliver_one(channel.as_ref(), &event).await })
            })
            .collect()
    }

    /// Deliver to every channel concurrently and wait for all of them.
    ///
    /// Returns one result per channel, in channel order.
    #[cfg(test)]
    pub(crate) async fn deliver(&self, event: &MatchEvent) -> Vec<DispatchResult> {
        let sends = self
            .channels
            .iter()
            .map(|channel| deliver_one(channel.as_ref(), event));
        futures::future::join_all(sends).await
    }
}

async fn deliver_one(channel: &dyn Notifier, event: &MatchEvent) -> DispatchResult {
    let start = Instant::now();
    let result = channel.send(event).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let (success, error) = match result {
        Ok(()) => {
            tracing::debug!(
                item_id = %event.item.id,
                channel = channel.channel_name(),
                duration_ms,
                "Notification delivered"
            );
            (true, None)
        }
        Err(e) => {
            tracing::debug!(
                item_id = %event.item.id,
                channel = channel.channel_name(),
                error = %e,
                duration_ms,
                "Notification delivery failed"
            );
            (false, Some(e.to_string()))
        }
    };

    DispatchResult {
        channel: channel.channel_name().to_string(),
        item_id: event.item.id.clone(),
        success,
        error,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NotifyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
        delay: Option<Duration>,
    }

    impl MockNotifier {
        fn boxed(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Arc<dyn Notifier> {
            Arc::new(Self {
                name: name.to_string(),
                send_count: Arc::clone(count),
                should_fail,
                delay: None,
            })
        }
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _event: &MatchEvent) -> Result<(), NotifyError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn sample() -> (Item, MatchOutcome) {
        (
            Item {
                id: "entry-1".to_string(),
                ..Default::default()
            },
            MatchOutcome {
                matched: vec!["stringContains:Go".to_string()],
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn deliver_to_all_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            MockNotifier::boxed("a", &count_a, false),
            MockNotifier::boxed("b", &count_b, false),
        ]);

        let (item, outcome) = sample();
        let results = dispatcher.deliver(&MatchEvent::new(item, outcome)).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[0].item_id, "entry-1");
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            MockNotifier::boxed("fail", &Arc::new(AtomicUsize::new(0)), true),
            MockNotifier::boxed("ok", &count, false),
        ]);

        let (item, outcome) = sample();
        let results = dispatcher.deliver(&MatchEvent::new(item, outcome)).await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert_eq!(results[0].error.as_deref(), Some("Configuration error: mock failure"));
        assert!(results[1].success);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_returns_before_slow_channel_finishes() {
        let count = Arc::new(AtomicUsize::new(0));
        let slow: Arc<dyn Notifier> = Arc::new(MockNotifier {
            name: "slow".to_string(),
            send_count: Arc::clone(&count),
            should_fail: false,
            delay: Some(Duration::from_millis(200)),
        });
        let dispatcher = Dispatcher::new(vec![slow]);

        let (item, outcome) = sample();
        let handles = dispatcher.dispatch(item, outcome);
        assert_eq!(handles.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.success);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_failure_is_swallowed() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            MockNotifier::boxed("fail", &count, true),
            MockNotifier::boxed("ok", &count, false),
        ]);

        let (item, outcome) = sample();
        let results = futures::future::join_all(dispatcher.dispatch(item, outcome)).await;
        let successes: Vec<bool> = results.into_iter().map(|r| r.unwrap().success).collect();
        assert_eq!(successes, vec![false, true]);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_dispatcher_does_nothing() {
        let dispatcher = Dispatcher::empty();
        assert!(dispatcher.is_empty());
        let (item, outcome) = sample();
        assert!(dispatcher.dispatch(item, outcome).is_empty());
    }

    #[test]
    fn channel_names_in_order() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            MockNotifier::boxed("stdout", &count, false),
            MockNotifier::boxed("gotify", &count, false),
        ]);
        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.channel_names(), vec!["stdout", "gotify"]);
    }
}
