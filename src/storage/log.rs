//! Durable record log abstraction
//!
//! The record store talks to its backing medium only through `RecordLog`.
//! `StorageWriter` is the file-backed implementation; `MemoryLog` keeps
//! records in memory for ephemeral stores and tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::errors::{StorageError, StorageResult};
use super::record::StoredRecord;

/// Append-only sink for stored records.
pub trait RecordLog: Send + Sync {
    /// Durably appends a record. Must not return until the record is persisted.
    fn append(&mut self, record: &StoredRecord) -> StorageResult<()>;

    /// Returns every record appended so far, oldest first.
    fn replay(&mut self) -> StorageResult<Vec<StoredRecord>>;

    /// Short description for logs (a path or `memory`)
    fn describe(&self) -> String;
}

/// In-memory record log.
///
/// Clones share the same records and failure switch, so a test can keep a
/// handle after moving the log into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Arc<Mutex<Vec<StoredRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-populated with records, as if replaying a file
    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent append fail with `QUILL_STORAGE_WRITE_FAILED`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the records appended so far
    pub fn records(&self) -> Vec<StoredRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl RecordLog for MemoryLog {
    fn append(&mut self, record: &StoredRecord) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write_failed(
                format!("Injected write failure for {}", record.key()),
                io::Error::new(io::ErrorKind::Other, "injected failure"),
            ));
        }
        self.records
            .lock()
            .map_err(|_| StorageError::lock_poisoned())?
            .push(record.clone());
        Ok(())
    }

    fn replay(&mut self) -> StorageResult<Vec<StoredRecord>> {
        let records = self.records.lock().map_err(|_| StorageError::lock_poisoned())?;
        Ok(records.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    #[test]
    fn test_memory_log_replays_in_order() {
        let mut log = MemoryLog::new();
        log.append(&StoredRecord::tombstone(EntityKind::Post, 1)).unwrap();
        log.append(&StoredRecord::tombstone(EntityKind::Post, 2)).unwrap();

        let ids: Vec<u64> = log.replay().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_injected_failure_appends_nothing() {
        let mut log = MemoryLog::new();
        log.set_fail_writes(true);

        let err = log
            .append(&StoredRecord::tombstone(EntityKind::Post, 1))
            .unwrap_err();
        assert!(!err.is_fatal());
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_clones_share_records() {
        let handle = MemoryLog::new();
        let mut log = handle.clone();
        log.append(&StoredRecord::tombstone(EntityKind::Category, 4)).unwrap();

        assert_eq!(handle.records().len(), 1);
        handle.set_fail_writes(true);
        assert!(log.append(&StoredRecord::tombstone(EntityKind::Category, 5)).is_err());
    }
}
