use crate::error::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix shared by every environment override, e.g. `EVENT_REGISTRY_MAX_LISTENERS_WARNING`.
pub const ENV_PREFIX: &str = "EVENT_REGISTRY";

/// Tuning knobs for an [`EventRegistry`](crate::EventRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Warn when an event gains more listeners than this. `0` disables the warning.
    pub max_listeners_warning: usize,
    /// Log every subscribe/unsubscribe/publish at debug level.
    pub trace_operations: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_listeners_warning: 10,
            trace_operations: false,
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `EVENT_REGISTRY_MAX_LISTENERS_WARNING` and
    /// `EVENT_REGISTRY_TRACE_OPERATIONS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        let variable = env_var_name("MAX_LISTENERS_WARNING");
        if let Some(max_listeners) = lookup(&variable) {
            config.max_listeners_warning = max_listeners.trim().parse().map_err(|e| {
                ConfigurationError::InvalidEnvironmentValue {
                    variable: variable.clone(),
                    reason: format!("{e}"),
                }
            })?;
        }

        let variable = env_var_name("TRACE_OPERATIONS");
        if let Some(trace) = lookup(&variable) {
            config.trace_operations = parse_flag(&trace).ok_or_else(|| {
                ConfigurationError::InvalidEnvironmentValue {
                    variable: variable.clone(),
                    reason: format!("expected a boolean, got '{trace}'"),
                }
            })?;
        }

        Ok(config)
    }

    /// Loads a configuration file (format inferred from the extension) and applies
    /// `EVENT_REGISTRY_*` environment overrides on top of it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn env_var_name(field: &str) -> String {
    format!("{ENV_PREFIX}_{field}")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
