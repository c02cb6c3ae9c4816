//! Storage error types
//!
//! | code                          | severity |
//! |-------------------------------|----------|
//! | `QUILL_STORAGE_WRITE_FAILED`  | ERROR    |
//! | `QUILL_STORAGE_READ_FAILED`   | ERROR    |
//! | `QUILL_STORAGE_LOCK_POISONED` | ERROR    |
//! | `QUILL_DATA_CORRUPTION`       | FATAL    |

use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call failed; the store can keep serving
    Error,
    /// The record file is untrustworthy and the store refuses to open
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Opening, appending to, or syncing the record file failed
    QuillStorageWriteFailed,
    /// The record file exists but could not be read
    QuillStorageReadFailed,
    QuillStorageLockPoisoned,
    /// Bad framing, checksum, or payload in the record file
    QuillDataCorruption,
}

impl StorageErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::QuillStorageWriteFailed => "QUILL_STORAGE_WRITE_FAILED",
            StorageErrorCode::QuillStorageReadFailed => "QUILL_STORAGE_READ_FAILED",
            StorageErrorCode::QuillStorageLockPoisoned => "QUILL_STORAGE_LOCK_POISONED",
            StorageErrorCode::QuillDataCorruption => "QUILL_DATA_CORRUPTION",
        }
    }

    pub fn severity(&self) -> Severity {
        if *self == StorageErrorCode::QuillDataCorruption {
            Severity::Fatal
        } else {
            Severity::Error
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failed storage operation: code, message, optional location, optional cause
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    /// Where in the record file the failure was found
    location: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            source: None,
        }
    }

    fn caused_by(mut self, source: io::Error) -> Self {
        self.source = Some(source);
        self
    }

    fn located(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::QuillStorageWriteFailed, message).caused_by(source)
    }

    /// Write refused before reaching the disk (encoding, size limit, poisoned writer)
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::QuillStorageWriteFailed, message)
    }

    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::QuillStorageReadFailed, message).caused_by(source)
    }

    pub fn lock_poisoned() -> Self {
        Self::new(
            StorageErrorCode::QuillStorageLockPoisoned,
            "Store lock poisoned by a panicked writer",
        )
    }

    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::QuillDataCorruption, reason)
            .located(format!("byte_offset: {}", offset))
    }

    pub fn corruption_for_record(key: &str, reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::QuillDataCorruption, reason)
            .located(format!("record: {}", key))
    }

    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Fatal errors mean the store must not be used
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        match &self.location {
            Some(location) => write!(f, " ({})", location),
            None => Ok(()),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
