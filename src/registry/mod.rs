//! # Registry Infrastructure
//!
//! The event registry and the pieces it is built from.
//!
//! ## Architecture
//!
//! ```text
//! EventRegistry<P>
//! ├── Mutex<HashMap<event name, Vec<Listener<P>>>>   (ordered, deduplicated by identity)
//! ├── RegistryConfig                                  (thresholds, operation tracing)
//! └── Arc<dyn FailureSink>                            (captured listener failures)
//! ```

pub mod event_registry;
pub mod listener;
pub mod sink;

pub use event_registry::{EventRegistry, RegistryStats};
pub use listener::Listener;
pub use sink::{FailureSink, TracingSink};
