//! Deduplicating notifier for user-facing messages.
//!
//! Message text is the sole identity: two different failures that render the
//! same text are one notification.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Default suppression window.
pub const DEFAULT_SUPPRESSION_WINDOW: Duration = Duration::from_millis(5000);

/// Where delivered notifications go (toast layer, log, test probe).
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, message: &str);
}

impl<F> NotificationSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn deliver(&self, message: &str) {
        self(message)
    }
}

/// Sink for headless use: notifications become `warn` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn deliver(&self, message: &str) {
        tracing::warn!(notification = message, "user notification");
    }
}

/// Suppresses repeats of a message for a fixed window after its delivery.
#[derive(Debug)]
pub struct Notifier {
    window: Duration,
    /// Message -> instant its suppression ends.
    suppressed: Mutex<HashMap<String, Instant>>,
}

impl Notifier {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            suppressed: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Deliver `message` unless it was delivered within the window.
    ///
    /// Returns whether `deliver` ran. Empty messages are ignored.
    pub fn notify_once<F>(&self, message: &str, deliver: F) -> bool
    where
        F: FnOnce(&str),
    {
        if message.is_empty() {
            return false;
        }

        let now = Instant::now();
        {
            let mut suppressed = self.suppressed.lock().unwrap_or_else(PoisonError::into_inner);
            suppressed.retain(|_, until| *until > now);

            if suppressed.contains_key(message) {
                tracing::debug!(message, "notification suppressed");
                return false;
            }
            suppressed.insert(message.to_owned(), now + self.window);
        }

        // Outside the lock: the callback may notify again.
        deliver(message);
        true
    }

    /// Whether `message` would currently be suppressed.
    pub fn is_suppressed(&self, message: &str) -> bool {
        let suppressed = self.suppressed.lock().unwrap_or_else(PoisonError::into_inner);
        suppressed
            .get(message)
            .is_some_and(|until| *until > Instant::now())
    }

    /// Forget every suppressed message.
    pub fn reset(&self) {
        self.suppressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPRESSION_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counter() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Clone) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            move |m: &str| seen.lock().unwrap().push(m.to_string())
        };
        (seen, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn repeats_within_window_are_delivered_once() {
        let notifier = Notifier::default();
        let (seen, sink) = counter();

        assert!(notifier.notify_once("Network error", &sink));
        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(!notifier.notify_once("Network error", &sink));

        assert_eq!(*seen.lock().unwrap(), vec!["Network error"]);
    }

    #[tokio::test(start_paused = true)]
    async fn message_is_deliverable_again_after_window() {
        let notifier = Notifier::new(Duration::from_millis(5000));
        let (seen, sink) = counter();

        notifier.notify_once("Unauthorized", &sink);
        tokio::time::advance(Duration::from_millis(5000)).await;
        assert!(!notifier.is_suppressed("Unauthorized"));
        assert!(notifier.notify_once("Unauthorized", &sink));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_messages_do_not_suppress_each_other() {
        let notifier = Notifier::default();
        let (seen, sink) = counter();

        notifier.notify_once("a", &sink);
        notifier.notify_once("b", &sink);
        notifier.notify_once("a", &sink);

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn empty_message_is_a_no_op() {
        let notifier = Notifier::default();
        let (seen, sink) = counter();

        assert!(!notifier.notify_once("", &sink));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn reset_clears_suppression_immediately() {
        let notifier = Notifier::default();
        let (seen, sink) = counter();

        notifier.notify_once("boom", &sink);
        notifier.reset();
        assert!(notifier.notify_once("boom", &sink));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn sink_trait_accepts_closures() {
        let (seen, sink) = counter();
        let boxed: Box<dyn NotificationSink> = Box::new(sink);
        boxed.deliver("hello");
        assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
    }
}
