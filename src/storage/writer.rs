//! Record file writer with fsync enforcement
//!
//! The file is append-only with no in-place updates. A write is not
//! acknowledged until the appended bytes have been fsynced.
//!
//! A failed append is rolled back by truncating the file to the last
//! acknowledged offset, so a partial record never sits in front of later
//! writes. If the rollback itself fails the writer is poisoned and refuses
//! every further append until the store is reopened.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::log::RecordLog;
use super::reader::StorageReader;
use super::record::StoredRecord;

/// Append-only writer for `<data_dir>/data/records.dat`.
pub struct StorageWriter {
    /// Path to the record file
    storage_path: PathBuf,
    /// Underlying file handle
    file: File,
    /// End of the last acknowledged record
    current_offset: u64,
    /// Set when a torn tail could not be truncated away
    poisoned: bool,
    /// Number of bytes the next write keeps before failing
    #[cfg(test)]
    torn_after: Option<usize>,
}

impl StorageWriter {
    /// Opens or creates the record file under the data directory.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns `QUILL_STORAGE_WRITE_FAILED` if the file cannot be created or opened.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let storage_path = super::records_path(data_dir);

        if let Some(parent) = storage_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create data directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open record file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
            poisoned: false,
            #[cfg(test)]
            torn_after: None,
        })
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current file offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs.
    ///
    /// Returns the byte offset where the record was written. On failure the
    /// file is cut back to that offset before the error is returned.
    pub fn write(&mut self, record: &StoredRecord) -> StorageResult<u64> {
        if self.poisoned {
            return Err(StorageError::write_failed_no_source(format!(
                "Record file {} has an unrecoverable torn tail; reopen the store",
                self.storage_path.display()
            )));
        }

        record.check_size()?;
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.write_and_sync(&serialized) {
            let message = match self.discard_tail() {
                Ok(()) => format!("Failed to write record: {}", record.key()),
                Err(truncate) => {
                    self.poisoned = true;
                    format!(
                        "Failed to write record: {} (truncating torn tail also failed: {})",
                        record.key(),
                        truncate
                    )
                }
            };
            return Err(StorageError::write_failed(message, e));
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    fn write_and_sync(&mut self, bytes: &[u8]) -> io::Result<()> {
        #[cfg(test)]
        if let Some(keep) = self.torn_after.take() {
            self.file.write_all(&bytes[..keep.min(bytes.len())])?;
            return Err(io::Error::other("no space left on device"));
        }

        self.file.write_all(bytes)?;
        self.file.sync_all()
    }

    fn discard_tail(&mut self) -> io::Result<()> {
        self.file.set_len(self.current_offset)?;
        self.file.sync_all()
    }
}

impl RecordLog for StorageWriter {
    fn append(&mut self, record: &StoredRecord) -> StorageResult<()> {
        self.write(record).map(|_| ())
    }

    fn replay(&mut self) -> StorageResult<Vec<StoredRecord>> {
        if self.current_offset == 0 {
            return Ok(Vec::new());
        }
        StorageReader::open(&self.storage_path)?.read_all()
    }

    fn describe(&self) -> String {
        self.storage_path.display().to_string()
    }
}
