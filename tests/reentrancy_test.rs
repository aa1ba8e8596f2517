//! Listeners that touch the registry while it is delivering.

mod common;

use common::*;
use event_registry::{EventRegistry, Listener};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::sync::Arc;

#[test]
fn test_unsubscribing_a_later_listener_mid_publish_only_affects_future_publishes() {
    let registry = Arc::new(EventRegistry::new());
    let log = CallLog::new();
    let victim = recording_listener(&log, "victim");

    let remover = {
        let registry = Arc::clone(&registry);
        let victim = victim.clone();
        let log = log.clone();
        Listener::new(move |payload: &Value| {
            log.record("remover", payload);
            registry.unsubscribe("x", &victim);
        })
    };

    registry.subscribe("x", &remover);
    registry.subscribe("x", &victim);

    registry.publish("x", &json!(1));
    assert_eq!(log.labels(), vec!["remover", "victim"]);

    registry.publish("x", &json!(2));
    assert_eq!(log.labels(), vec!["remover", "victim", "remover"]);
}

#[test]
fn test_listener_can_unsubscribe_itself() {
    let registry = Arc::new(EventRegistry::new());
    let log = CallLog::new();
    let slot: Arc<Mutex<Option<Listener<Value>>>> = Arc::default();

    let once = {
        let registry = Arc::clone(&registry);
        let slot = Arc::clone(&slot);
        let log = log.clone();
        Listener::new(move |payload: &Value| {
            log.record("once", payload);
            if let Some(me) = slot.lock().take() {
                registry.unsubscribe("x", &me);
            }
        })
    };
    *slot.lock() = Some(once.clone());

    registry.subscribe("x", &once);
    registry.publish("x", &json!(1));
    registry.publish("x", &json!(2));

    assert_eq!(log.labels(), vec!["once"]);
    assert!(!registry.has_listeners("x"));
}

#[test]
fn test_nested_publish_from_listener() {
    let registry = Arc::new(EventRegistry::new());
    let log = CallLog::new();

    let forwarder = {
        let registry = Arc::clone(&registry);
        let log = log.clone();
        Listener::new(move |payload: &Value| {
            log.record("forwarder", payload);
            registry.publish("audit", &json!({"forwarded": payload}));
        })
    };
    let auditor = recording_listener(&log, "auditor");

    registry.subscribe("x", &forwarder);
    registry.subscribe("audit", &auditor);
    registry.publish("x", &json!(42));

    assert_eq!(
        log.entries(),
        vec![
            ("forwarder".to_string(), json!(42)),
            ("auditor".to_string(), json!({"forwarded": 42})),
        ]
    );
}

#[test]
fn test_payload_mutation_is_visible_to_later_listeners() {
    let registry: EventRegistry<RefCell<Vec<&'static str>>> = EventRegistry::new();

    let first = Listener::new(|trail: &RefCell<Vec<&'static str>>| {
        trail.borrow_mut().push("first");
    });
    let second = Listener::new(|trail: &RefCell<Vec<&'static str>>| {
        let seen_first = trail.borrow().contains(&"first");
        trail.borrow_mut().push(if seen_first { "second saw first" } else { "second alone" });
    });

    registry.subscribe("x", &first);
    registry.subscribe("x", &second);

    let trail = RefCell::new(Vec::new());
    registry.publish("x", &trail);

    assert_eq!(trail.into_inner(), vec!["first", "second saw first"]);
}

#[test]
fn test_failing_listener_that_mutates_registry_still_applies_change() {
    let sink = CollectingSink::new();
    let registry = Arc::new(EventRegistry::new().with_failure_sink(sink.clone()));
    let log = CallLog::new();
    let late = recording_listener(&log, "late");

    let adder = {
        let registry = Arc::clone(&registry);
        let late = late.clone();
        Listener::fallible(move |_: &Value| {
            registry.subscribe("x", &late);
            Err("added a listener, then failed")
        })
    };

    registry.subscribe("x", &adder);
    registry.publish("x", &json!(1));
    assert!(log.is_empty());
    assert!(registry.is_subscribed("x", &late));

    registry.publish("x", &json!(2));
    assert_eq!(log.labels(), vec!["late"]);
    assert_eq!(sink.failures().len(), 2);
}
