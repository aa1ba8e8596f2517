#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # Event Registry
//!
//! In-process publish/subscribe: callers register listeners under event names, producers
//! publish a payload under a name, and every listener currently registered for that name
//! is invoked synchronously, in subscription order, on the publishing thread.
//!
//! ## Overview
//!
//! - [`EventRegistry`] owns the mapping from event name to listeners. It is independently
//!   constructible, generic over the payload type, and safe to share between threads.
//! - [`Listener`] is a shared callback handle; its identity (not its code) decides
//!   deduplication and unsubscription.
//! - A listener that returns an error or panics is isolated: the failure is reported to
//!   a [`FailureSink`] (by default logged through `tracing`) and delivery continues.
//! - [`global()`] exposes a process-wide registry carrying [`serde_json::Value`]
//!   payloads, with the [`subscribe`], [`unsubscribe`] and [`publish`] shortcuts.
//!
//! ## Module Organization
//!
//! - [`registry`] - The registry, listener handles and failure sinks
//! - [`config`] - Registry configuration
//! - [`error`] - Listener failure and configuration error types
//! - [`logging`] - Console logging setup and the `log_registry!` macro
//!
//! ## Quick Start
//!
//! ```rust
//! use event_registry::{publish, subscribe, unsubscribe, Listener};
//! use serde_json::{json, Value};
//!
//! let greeter = Listener::named("greeter", |user: &Value| {
//!     println!("welcome, user {}", user["id"]);
//! });
//!
//! subscribe("user.created", &greeter);
//! publish("user.created", &json!({"id": 1}));
//! unsubscribe("user.created", &greeter);
//! ```

pub mod config;
pub mod error;
pub mod global;
pub mod logging;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{
    ConfigurationError, ListenerError, ListenerFailureCause, ListenerInvocationFailure,
    ListenerResult,
};
pub use global::{global, publish, subscribe, unsubscribe};
pub use registry::{EventRegistry, FailureSink, Listener, RegistryStats, TracingSink};

// Paths used by `log_registry!`.
#[doc(hidden)]
pub mod __private {
    pub use chrono;
    pub use tracing;
}
