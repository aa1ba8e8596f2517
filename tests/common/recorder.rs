//! Listeners and sinks that record what happened, for asserting on delivery order.

use event_registry::{FailureSink, ListenerInvocationFailure, Listener};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Ordered record of listener invocations, shared between listeners.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<(String, Value)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, payload: &Value) {
        self.entries.lock().push((label.to_string(), payload.clone()));
    }

    /// Labels in invocation order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Listener that appends `(label, payload)` to `log`.
pub fn recording_listener(log: &CallLog, label: &'static str) -> Listener<Value> {
    let log = log.clone();
    Listener::named(label, move |payload: &Value| log.record(label, payload))
}

/// Failure sink that keeps every reported failure.
#[derive(Default)]
pub struct CollectingSink {
    failures: Mutex<Vec<ReportedFailure>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedFailure {
    pub event_name: String,
    pub listener_name: Option<String>,
    pub label: &'static str,
    pub message: String,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failures(&self) -> Vec<ReportedFailure> {
        self.failures.lock().clone()
    }
}

impl FailureSink for CollectingSink {
    fn report(&self, failure: &ListenerInvocationFailure) {
        self.failures.lock().push(ReportedFailure {
            event_name: failure.event_name.clone(),
            listener_name: failure.listener_name.clone(),
            label: failure.as_label(),
            message: failure.cause.to_string(),
        });
    }
}
