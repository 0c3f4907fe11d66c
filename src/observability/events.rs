//! Observable events emitted by the range engine
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Range scans
    /// Sub-cursor positioned at a new seek key
    RangeSeek,
    /// Range scan ran out of matching entries
    RangeExhausted,
    /// A working bound was tightened from an observed value
    BoundTightened,
    /// Keyset resume refused for the current range shape
    KeysetRejected,

    // Query operations
    /// Query received
    QueryStart,
    /// Query finished
    QueryComplete,

    // Setup
    /// Configuration loaded
    ConfigLoaded,
    /// Index populated from input records
    IndexBuilt,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RangeSeek => "RANGE_SEEK",
            Event::RangeExhausted => "RANGE_EXHAUSTED",
            Event::BoundTightened => "BOUND_TIGHTENED",
            Event::KeysetRejected => "KEYSET_REJECTED",
            Event::QueryStart => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::IndexBuilt => "INDEX_BUILT",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RangeSeek | Event::RangeExhausted | Event::BoundTightened => Severity::Trace,
            Event::KeysetRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::RangeSeek,
            Event::RangeExhausted,
            Event::BoundTightened,
            Event::KeysetRejected,
            Event::QueryStart,
            Event::QueryComplete,
            Event::ConfigLoaded,
            Event::IndexBuilt,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::KeysetRejected.severity(), Severity::Warn);
        assert_eq!(Event::BoundTightened.severity(), Severity::Trace);
        assert_eq!(Event::RangeSeek.severity(), Severity::Trace);
        assert_eq!(Event::QueryComplete.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::RangeExhausted), "RANGE_EXHAUSTED");
    }
}
