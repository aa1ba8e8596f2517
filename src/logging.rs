//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//!
//! The registry itself only emits `tracing` events; nothing is printed unless the host
//! installs a subscriber. [`init_structured_logging`] is a convenience for binaries and
//! tests that do not already have one.
//!
//! ## Environment
//!
//! - `EVENT_REGISTRY_ENV` / `APP_ENV`: `test` and `development` log at debug,
//!   `production` at info.
//! - `RUST_LOG`: overrides the environment default when set.
//! - `EVENT_REGISTRY_LOG_FORMAT=json`: JSON lines instead of the human-readable format.

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process.
///
/// Leaves an already-installed global subscriber in place.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if use_json_format() {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
            return;
        }

        tracing::info!(
            environment = %environment,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("EVENT_REGISTRY_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("EVENT_REGISTRY_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log registry operations with a stable `operation` field and timestamp.
#[macro_export]
macro_rules! log_registry {
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        $crate::__private::tracing::$level!(
            operation = %$operation,
            timestamp = %$crate::__private::chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    // Form with event name
    ($level:ident, $operation:expr, event: $event:expr $(, $key:ident: $value:expr)* $(,)?) => {
        $crate::__private::tracing::$level!(
            operation = %$operation,
            event_name = %$event,
            $($key = ?$value,)*
            timestamp = %$crate::__private::chrono::Utc::now().to_rfc3339(),
            "{} ({})", $operation, $event
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        $crate::__private::tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %$crate::__private::chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}
