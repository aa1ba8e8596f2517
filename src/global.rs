//! Process-wide default registry.
//!
//! Lets unrelated parts of an application communicate without passing a registry
//! reference around. Payloads are untyped [`serde_json::Value`]s; the expected shape of
//! each event is a convention between its publishers and subscribers.

use crate::config::RegistryConfig;
use crate::registry::{EventRegistry, Listener};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

static GLOBAL_REGISTRY: OnceLock<EventRegistry<Value>> = OnceLock::new();

/// The shared registry, created on first use from `EVENT_REGISTRY_*` environment settings.
pub fn global() -> &'static EventRegistry<Value> {
    GLOBAL_REGISTRY.get_or_init(|| {
        let config = RegistryConfig::from_env().unwrap_or_else(|e| {
            warn!(
                error = %e,
                "Invalid registry configuration in environment; using defaults"
            );
            RegistryConfig::default()
        });
        EventRegistry::with_config(config)
    })
}

/// Subscribe `listener` to `event_name` on the [`global`] registry.
pub fn subscribe(event_name: &str, listener: &Listener<Value>) {
    global().subscribe(event_name, listener);
}

/// Unsubscribe `listener` from `event_name` on the [`global`] registry.
pub fn unsubscribe(event_name: &str, listener: &Listener<Value>) {
    global().unsubscribe(event_name, listener);
}

/// Publish `payload` to `event_name` on the [`global`] registry.
pub fn publish(event_name: &str, payload: &Value) {
    global().publish(event_name, payload);
}
