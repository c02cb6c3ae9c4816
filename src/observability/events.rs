//! Observable events in quilldb

use std::fmt;

use super::logger::Severity;

/// Events emitted by the store and the content service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Record log replayed and store ready
    StoreOpened,
    /// Sample content written to an empty store
    StoreSeeded,

    // Writes
    CategoryCreated,
    CategoryDeleted,
    PostCreated,
    PostUpdated,
    PostDeleted,
    /// Category deletion removed referencing posts
    CascadeDelete,
    /// Write refused for validation or integrity reasons
    WriteRejected,

    // Reads
    QueryExecuted,

    // Failures
    /// Record log append failed
    StorageFailure,
    /// Record file failed checksum or constraint checks
    DataCorruption,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreSeeded => "STORE_SEEDED",
            Event::CategoryCreated => "CATEGORY_CREATED",
            Event::CategoryDeleted => "CATEGORY_DELETED",
            Event::PostCreated => "POST_CREATED",
            Event::PostUpdated => "POST_UPDATED",
            Event::PostDeleted => "POST_DELETED",
            Event::CascadeDelete => "CASCADE_DELETE",
            Event::WriteRejected => "WRITE_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::StorageFailure => "STORAGE_FAILURE",
            Event::DataCorruption => "DATA_CORRUPTION",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryExecuted => Severity::Trace,
            Event::WriteRejected | Event::CascadeDelete => Severity::Warn,
            Event::StorageFailure => Severity::Error,
            Event::DataCorruption => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
