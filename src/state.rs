//! Display State: the single observable slot holding the last decoded message.
//!
//! [`DisplayState`] wraps a [`tokio::sync::watch`] channel. Every inbound
//! message replaces the whole value and wakes all subscribers; nothing from
//! earlier messages is kept. Before the first message the slot holds the
//! empty string.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;

use crate::error::ViewError;

/// Observable slot holding the most recently decoded inbound message.
///
/// Cloning is cheap and every clone refers to the same slot.
#[derive(Debug, Clone)]
pub struct DisplayState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    sender: watch::Sender<Value>,
    updates: AtomicU64,
}

impl DisplayState {
    /// Creates a slot holding [`DisplayState::initial_value`].
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Self::initial_value());
        Self {
            inner: Arc::new(Inner {
                sender,
                updates: AtomicU64::new(0),
            }),
        }
    }

    /// The value held before any message has arrived: an empty string.
    #[must_use]
    pub fn initial_value() -> Value {
        Value::String(String::new())
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn current(&self) -> Value {
        self.inner.sender.borrow().clone()
    }

    /// Returns a receiver notified on every assignment.
    ///
    /// The current value is marked as seen; the first `changed()` resolves
    /// on the next assignment.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Value> {
        self.inner.sender.subscribe()
    }

    /// Replaces the value and notifies subscribers.
    ///
    /// Subscribers are woken even when `value` equals the current value.
    pub fn replace(&self, value: Value) {
        self.inner.sender.send_replace(value);
        self.inner.updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Decodes `payload` and assigns it.
    ///
    /// A payload that is not valid JSON leaves the current value untouched.
    /// The failure is reported as a `tracing` error event and is not returned.
    pub fn apply_message(&self, payload: &str) {
        match decode_payload(payload) {
            Ok(value) => self.replace(value),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    len = payload.len(),
                    "failed to decode inbound message"
                );
            }
        }
    }

    /// Number of assignments made so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.inner.updates.load(Ordering::Relaxed)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a text payload into a JSON value of whatever shape it carries.
///
/// # Errors
///
/// Returns [`ViewError::Decode`] if `payload` is not a JSON document.
pub fn decode_payload(payload: &str) -> Result<Value, ViewError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;

    /// Writer appending formatted log lines into a shared buffer.
    #[derive(Debug, Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            let Ok(buf) = self.0.lock() else {
                panic!("log buffer poisoned");
            };
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let Ok(mut buf) = self.0.lock() else {
                panic!("log buffer poisoned");
            };
            buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn starts_with_empty_string() {
        let state = DisplayState::new();
        assert_eq!(state.current(), json!(""));
        assert_eq!(state.update_count(), 0);
    }

    #[test]
    fn single_message_sets_object() {
        let state = DisplayState::new();
        state.apply_message(r#"{"a":1}"#);
        assert_eq!(state.current(), json!({"a": 1}));
        assert_eq!(state.update_count(), 1);
    }

    #[test]
    fn second_message_overwrites_first() {
        let state = DisplayState::new();
        state.apply_message(r#"{"a":1}"#);
        state.apply_message(r#"{"b":2}"#);
        assert_eq!(state.current(), json!({"b": 2}));
    }

    #[test]
    fn non_object_payloads_keep_their_type() {
        let state = DisplayState::new();
        state.apply_message(r#""hello""#);
        assert_eq!(state.current(), Value::String("hello".to_string()));
        state.apply_message("42");
        assert_eq!(state.current(), json!(42));
        state.apply_message("[1,2,3]");
        assert_eq!(state.current(), json!([1, 2, 3]));
        state.apply_message("null");
        assert_eq!(state.current(), Value::Null);
    }

    #[test]
    fn malformed_payload_keeps_prior_value() {
        let state = DisplayState::new();
        state.apply_message(r#"{"a":1}"#);
        state.apply_message("not valid json");
        assert_eq!(state.current(), json!({"a": 1}));
        assert_eq!(state.update_count(), 1);
    }

    #[test]
    fn malformed_payload_before_first_message_keeps_initial() {
        let state = DisplayState::new();
        state.apply_message("{");
        assert_eq!(state.current(), DisplayState::initial_value());
    }

    #[test]
    fn malformed_payload_emits_one_error_event() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let state = DisplayState::new();
        state.apply_message(r#"{"a":1}"#);
        tracing::subscriber::with_default(subscriber, || {
            state.apply_message("not valid json");
        });

        let output = logs.contents();
        let errors: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("ERROR"))
            .collect();
        assert_eq!(errors.len(), 1, "log output: {output}");
        assert!(
            errors
                .iter()
                .all(|line| line.contains("failed to decode inbound message"))
        );
        assert_eq!(state.current(), json!({"a": 1}));
    }

    #[test]
    fn decode_reports_error() {
        let result = decode_payload("not valid json");
        assert!(matches!(result, Err(ViewError::Decode(_))));
    }

    #[test]
    fn clones_share_the_slot() {
        let state = DisplayState::new();
        let other = state.clone();
        other.replace(json!(true));
        assert_eq!(state.current(), json!(true));
    }

    #[tokio::test]
    async fn subscriber_sees_each_assignment() {
        let state = DisplayState::new();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap_or(true));

        state.apply_message(r#"{"a":1}"#);
        let Ok(()) = rx.changed().await else {
            panic!("sender dropped");
        };
        assert_eq!(*rx.borrow_and_update(), json!({"a": 1}));

        // Same value again still counts as an assignment.
        state.apply_message(r#"{"a":1}"#);
        assert!(rx.has_changed().unwrap_or(false));
    }

    #[tokio::test]
    async fn malformed_payload_does_not_notify() {
        let state = DisplayState::new();
        let rx = state.subscribe();
        state.apply_message("not valid json");
        assert!(!rx.has_changed().unwrap_or(true));
    }
}
