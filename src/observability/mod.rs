//! Observability subsystem for quilldb
//!
//! - Structured logging (JSON lines on stderr)
//! - Monotonic counters
//! - Typed lifecycle and write events
//!
//! Observability is read-only: it never changes the outcome of an operation,
//! and a failed log write is ignored.
//!
//! # Usage
//!
//! ```ignore
//! use quilldb::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::PostCreated, &[("post_id", "7")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_posts_created();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
