//! Diagnostic sinks for captured listener failures.

use crate::error::ListenerInvocationFailure;
use tracing::error;

/// Receives every [`ListenerInvocationFailure`] captured during `publish`.
///
/// Called synchronously on the publishing thread, after the failing listener returned or
/// unwound and before the next listener runs. Implementations must not panic.
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: &ListenerInvocationFailure);
}

/// Default sink: logs the failure at `error` level through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn report(&self, failure: &ListenerInvocationFailure) {
        error!(
            event_name = %failure.event_name,
            listener_id = failure.listener_id,
            listener_name = failure.listener_name.as_deref(),
            failure = failure.as_label(),
            error = %failure.cause,
            error_detail = ?failure.cause,
            "Listener failed while handling event"
        );
    }
}

impl<F> FailureSink for F
where
    F: Fn(&ListenerInvocationFailure) + Send + Sync,
{
    fn report(&self, failure: &ListenerInvocationFailure) {
        self(failure)
    }
}
