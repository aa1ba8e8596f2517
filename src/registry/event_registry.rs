//! # Event Registry
//!
//! Maps event names to the ordered set of listeners subscribed to them and delivers
//! published payloads to those listeners synchronously.
//!
//! ## Key Features
//!
//! - **Insertion-ordered delivery**: listeners run in the order they were (last)
//!   subscribed
//! - **Identity deduplication**: a listener is registered at most once per event name
//! - **Fault isolation**: a listener that returns an error or panics is reported to the
//!   [`FailureSink`] and the remaining listeners still run
//! - **Snapshot traversal**: `publish` works on a copy of the listener list taken under
//!   the lock, so listeners may subscribe, unsubscribe or publish re-entrantly
//!
//! ## Usage
//!
//! ```rust
//! use event_registry::{EventRegistry, Listener};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! let registry: EventRegistry<u64> = EventRegistry::new();
//! let total = Arc::new(AtomicU64::new(0));
//!
//! let counter = {
//!     let total = Arc::clone(&total);
//!     Listener::new(move |amount: &u64| {
//!         total.fetch_add(*amount, Ordering::SeqCst);
//!     })
//! };
//!
//! registry.subscribe("order.paid", &counter);
//! registry.publish("order.paid", &40);
//! registry.unsubscribe("order.paid", &counter);
//! registry.publish("order.paid", &2);
//!
//! assert_eq!(total.load(Ordering::SeqCst), 40);
//! ```

use super::listener::Listener;
use super::sink::{FailureSink, TracingSink};
use crate::config::RegistryConfig;
use crate::error::{ListenerFailureCause, ListenerInvocationFailure};
use crate::log_registry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// In-process publish/subscribe registry for payloads of type `P`.
pub struct EventRegistry<P> {
    listeners: Mutex<HashMap<String, Vec<Listener<P>>>>,
    config: RegistryConfig,
    sink: Arc<dyn FailureSink>,
    counters: Counters,
}

#[derive(Default)]
struct Counters {
    publishes: AtomicU64,
    deliveries: AtomicU64,
    failures: AtomicU64,
}

impl<P> EventRegistry<P> {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
            config,
            sink: Arc::new(TracingSink),
            counters: Counters::default(),
        }
    }

    /// Replace the sink that receives listener failures.
    pub fn with_failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribe `listener` to `event_name`.
    ///
    /// Subscribing a listener that is already registered for the name has no effect; it
    /// keeps its original position and is still invoked once per publish.
    pub fn subscribe(&self, event_name: &str, listener: &Listener<P>) {
        let count = {
            let mut listeners = self.listeners.lock();
            let entry = listeners.entry(event_name.to_string()).or_default();
            if entry.iter().any(|existing| existing.same_as(listener)) {
                None
            } else {
                entry.push(listener.clone());
                Some(entry.len())
            }
        };

        let Some(count) = count else {
            if self.config.trace_operations {
                log_registry!(debug, "subscribe_duplicate", event: event_name,
                    listener_id: listener.id()
                );
            }
            return;
        };

        if self.config.trace_operations {
            log_registry!(debug, "subscribe", event: event_name,
                listener_id: listener.id(),
                listeners: count
            );
        }

        let threshold = self.config.max_listeners_warning;
        if threshold > 0 && threshold.checked_add(1) == Some(count) {
            warn!(
                event_name = %event_name,
                listeners = count,
                threshold = threshold,
                "Listener count exceeded warning threshold; possible listener leak"
            );
        }
    }

    /// Remove `listener` from `event_name`. Unknown names and absent listeners are ignored.
    pub fn unsubscribe(&self, event_name: &str, listener: &Listener<P>) {
        let removed = {
            let mut listeners = self.listeners.lock();
            match listeners.get_mut(event_name) {
                Some(entry) => {
                    let before = entry.len();
                    entry.retain(|existing| !existing.same_as(listener));
                    let removed = entry.len() != before;
                    if entry.is_empty() {
                        listeners.remove(event_name);
                    }
                    removed
                }
                None => false,
            }
        };

        if self.config.trace_operations {
            log_registry!(debug, "unsubscribe", event: event_name,
                listener_id: listener.id(),
                removed: removed
            );
        }
    }

    /// Deliver `payload` to every listener subscribed to `event_name`.
    ///
    /// Listeners run on the calling thread, in subscription order, against the set that
    /// was registered when this call started. Failures are reported to the failure sink
    /// and never reach the caller.
    pub fn publish(&self, event_name: &str, payload: &P) {
        let snapshot = match self.listeners.lock().get(event_name) {
            Some(entry) if !entry.is_empty() => entry.clone(),
            _ => {
                if self.config.trace_operations {
                    log_registry!(debug, "publish_no_listeners", event: event_name);
                }
                return;
            }
        };

        self.counters.publishes.fetch_add(1, Ordering::Relaxed);

        let mut failed = 0_usize;
        for listener in &snapshot {
            self.counters.deliveries.fetch_add(1, Ordering::Relaxed);
            if let Err(cause) = invoke(listener, payload) {
                failed += 1;
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                self.report_failure(event_name, listener, cause);
            }
        }

        if self.config.trace_operations {
            log_registry!(debug, "publish", event: event_name,
                listeners: snapshot.len(),
                failed: failed
            );
        }
    }

    fn report_failure(
        &self,
        event_name: &str,
        listener: &Listener<P>,
        cause: ListenerFailureCause,
    ) {
        let failure = ListenerInvocationFailure {
            event_name: event_name.to_string(),
            listener_id: listener.id(),
            listener_name: listener.name().map(str::to_string),
            cause,
        };

        // A panicking sink must not break delivery to the remaining listeners.
        if catch_unwind(AssertUnwindSafe(|| self.sink.report(&failure))).is_err() {
            TracingSink.report(&failure);
        }
    }

    /// Number of listeners subscribed to `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners.lock().get(event_name).map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, event_name: &str) -> bool {
        self.listener_count(event_name) > 0
    }

    /// Whether `listener` is subscribed to `event_name`.
    pub fn is_subscribed(&self, event_name: &str, listener: &Listener<P>) -> bool {
        self.listeners
            .lock()
            .get(event_name)
            .is_some_and(|entry| entry.iter().any(|existing| existing.same_as(listener)))
    }

    /// Event names that currently have at least one listener, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every listener of `event_name`, returning how many were removed.
    pub fn remove_event(&self, event_name: &str) -> usize {
        let removed = self
            .listeners
            .lock()
            .remove(event_name)
            .map_or(0, |entry| entry.len());

        if self.config.trace_operations {
            log_registry!(debug, "remove_event", event: event_name, removed: removed);
        }
        removed
    }

    /// Drop every listener of every event.
    pub fn clear(&self) {
        let removed: usize = {
            let mut listeners = self.listeners.lock();
            let removed = listeners.values().map(Vec::len).sum();
            listeners.clear();
            removed
        };

        if self.config.trace_operations {
            log_registry!(debug, "clear", removed: removed);
        }
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        let (event_names, listeners) = {
            let listeners = self.listeners.lock();
            (listeners.len(), listeners.values().map(Vec::len).sum())
        };

        RegistryStats {
            event_names,
            listeners,
            publishes: self.counters.publishes.load(Ordering::Relaxed),
            deliveries: self.counters.deliveries.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }
}

/// Runs one listener inside a fault boundary.
fn invoke<P>(listener: &Listener<P>, payload: &P) -> Result<(), ListenerFailureCause> {
    match catch_unwind(AssertUnwindSafe(|| listener.call(payload))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(ListenerFailureCause::Returned(error)),
        Err(panic) => Err(ListenerFailureCause::from_panic(panic.as_ref())),
    }
}

impl<P> Default for EventRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EventRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .field("sink", &"<Arc<dyn FailureSink>>")
            .finish()
    }
}

/// Statistics about a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Event names with at least one listener.
    pub event_names: usize,
    /// Total (event name, listener) registrations.
    pub listeners: usize,
    /// `publish` calls that found at least one listener.
    pub publishes: u64,
    /// Listener invocations, successful or not.
    pub deliveries: u64,
    /// Listener invocations that returned an error or panicked.
    pub failures: u64,
}
