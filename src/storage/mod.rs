//! Record storage subsystem for quilldb
//!
//! Holds the durable state of both tables in one append-only record file,
//! `<data_dir>/data/records.dat`.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Checksum-verified on every read
//! - fsync before a write is acknowledged
//! - Tombstones preserved forever, so ids are never reused
//! - Latest record wins for the same `(kind, id)`

mod checksum;
mod errors;
mod log;
mod reader;
mod record;
mod writer;

use std::path::{Path, PathBuf};

pub use checksum::compute_checksum;
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use log::{MemoryLog, RecordLog};
pub use reader::StorageReader;
pub use record::StoredRecord;
pub use writer::StorageWriter;

/// Location of the record file inside a data directory
pub fn records_path(data_dir: &Path) -> PathBuf {
    data_dir.join("data").join("records.dat")
}
