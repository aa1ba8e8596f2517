use proptest::prelude::*;

pub const EVENT_NAMES: [&str; 3] = ["user.created", "user.deleted", "order.paid"];
pub const LISTENER_COUNT: usize = 4;

/// One registry operation against a small fixed universe of events and listeners.
#[derive(Debug, Clone, Copy)]
pub enum RegistryOp {
    Subscribe { event: usize, listener: usize },
    Unsubscribe { event: usize, listener: usize },
    Publish { event: usize },
}

/// Strategy for generating single registry operations
pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    let event = 0..EVENT_NAMES.len();
    let listener = 0..LISTENER_COUNT;
    prop_oneof![
        3 => (event.clone(), listener.clone())
            .prop_map(|(event, listener)| RegistryOp::Subscribe { event, listener }),
        2 => (event.clone(), listener)
            .prop_map(|(event, listener)| RegistryOp::Unsubscribe { event, listener }),
        2 => event.prop_map(|event| RegistryOp::Publish { event }),
    ]
}

/// Strategy for generating operation sequences
pub fn registry_ops_strategy() -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..60)
}
