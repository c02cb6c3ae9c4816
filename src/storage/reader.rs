//! Record file reader with strict corruption detection
//!
//! Every read validates the checksum. Any checksum or framing failure is
//! reported as `QUILL_DATA_CORRUPTION`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{StoredRecord, MIN_RECORD_SIZE};

/// Sequential reader over the record file.
pub struct StorageReader {
    /// Path to the record file
    storage_path: PathBuf,
    /// Buffered reader
    reader: BufReader<File>,
    /// Current byte offset
    current_offset: u64,
    /// Total file size
    file_size: u64,
}

impl StorageReader {
    /// Opens the record file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open record file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Opens the record file under a data directory.
    pub fn open_from_data_dir(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&super::records_path(data_dir))
    }

    /// Returns the record file path.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns the current read offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Returns whether there are more records to read.
    pub fn has_more(&self) -> bool {
        self.current_offset < self.file_size
    }

    /// Reads the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(QUILL_DATA_CORRUPTION)` on checksum or framing failure
    pub fn read_next(&mut self) -> StorageResult<Option<StoredRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        let min_size = MIN_RECORD_SIZE as u64;

        if remaining < min_size {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated record file: {} bytes remaining, minimum record size is {}",
                    remaining, min_size
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < min_size {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);

        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, bytes_consumed) = StoredRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += bytes_consumed as u64;

        Ok(Some(record))
    }

    /// Reads all remaining records. Any corruption causes immediate failure.
    pub fn read_all(&mut self) -> StorageResult<Vec<StoredRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}
