//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Scan metrics (atomic counters)
//! - Typed events
//!
//! Observability is read-only: nothing here changes what a scan returns.
//!
//! # Usage
//!
//! ```ignore
//! use rangeseek::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::QueryComplete, &[("rows", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_seeks();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::QueryStart);
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/test.json")]);
    }
}
