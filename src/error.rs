//! # Error Types
//!
//! The registry has a single runtime failure mode, [`ListenerInvocationFailure`], which is
//! always captured inside `publish` and handed to a [`FailureSink`](crate::FailureSink).
//! Configuration loading reports [`ConfigurationError`].

use std::fmt;
use thiserror::Error;

/// Boxed error a listener may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of a fallible listener.
pub type ListenerResult = std::result::Result<(), ListenerError>;

/// Why a listener invocation failed.
#[derive(Error, Debug)]
pub enum ListenerFailureCause {
    /// The listener returned an error.
    #[error("listener returned error: {0}")]
    Returned(#[source] ListenerError),

    /// The listener panicked; the panic message is preserved when it is a string.
    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl ListenerFailureCause {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerFailureCause::Returned(_) => "listener_error",
            ListenerFailureCause::Panicked(_) => "listener_panic",
        }
    }

    /// Builds a cause from the payload of a caught panic.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        ListenerFailureCause::Panicked(message)
    }
}

/// A listener failed while an event was being published.
///
/// Never returned to the caller of `publish`: it is reported to the registry's failure
/// sink and delivery continues with the next listener.
#[derive(Error, Debug)]
pub struct ListenerInvocationFailure {
    /// Event that was being published.
    pub event_name: String,
    /// Process-unique id of the failing listener.
    pub listener_id: u64,
    /// Optional diagnostic name given to the listener.
    pub listener_name: Option<String>,
    /// What went wrong.
    #[source]
    pub cause: ListenerFailureCause,
}

impl fmt::Display for ListenerInvocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.listener_name {
            Some(name) => write!(
                f,
                "listener '{}' (#{}) failed on event '{}': {}",
                name, self.listener_id, self.event_name, self.cause
            ),
            None => write!(
                f,
                "listener #{} failed on event '{}': {}",
                self.listener_id, self.event_name, self.cause
            ),
        }
    }
}

impl ListenerInvocationFailure {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        self.cause.as_label()
    }
}

/// Errors raised while loading [`RegistryConfig`](crate::RegistryConfig).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {variable}: {reason}")]
    InvalidEnvironmentValue { variable: String, reason: String },

    /// A configuration source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

impl ConfigurationError {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigurationError::InvalidEnvironmentValue { .. } => "config_invalid_env",
            ConfigurationError::Load(_) => "config_load_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
