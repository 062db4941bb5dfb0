//! Analytics sink for preference transitions.
//!
//! Fire-and-forget: implementations must not block or fail the caller.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

/// Receives analytics events.
pub trait AnalyticsSink: Send + Sync {
    /// Record a named event with parameters.
    fn log_event(&self, name: &str, params: Value);

    /// Record a value transition as `<name>_change`.
    fn log_value_change(&self, name: &str, old_value: Value, new_value: Value) {
        self.log_event(
            &format!("{}_change", name),
            json!({ "oldValue": old_value, "newValue": new_value }),
        );
    }
}

/// Serialize a value for an event, falling back to null.
pub fn event_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Sink that writes events to the `analytics` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn log_event(&self, name: &str, params: Value) {
        info!(target: "analytics", event = name, %params, "analytics event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, Value)>>,
    }

    impl AnalyticsSink for Recorder {
        fn log_event(&self, name: &str, params: Value) {
            self.events.lock().unwrap().push((name.to_string(), params));
        }
    }

    #[test]
    fn test_value_change_event_shape() {
        let recorder = Recorder::default();
        recorder.log_value_change("wbw_locale", json!("en"), json!("fa"));

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "wbw_locale_change");
        assert_eq!(events[0].1, json!({ "oldValue": "en", "newValue": "fa" }));
    }

    #[test]
    fn test_event_value_keeps_order() {
        use crate::types::WordByWordDisplay;

        let value = event_value(&vec![WordByWordDisplay::Tooltip, WordByWordDisplay::Inline]);
        assert_eq!(value, json!(["tooltip", "inline"]));
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        TracingAnalytics.log_value_change("wbw_display", json!([]), json!(["inline"]));
    }
}
