//! On-disk record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Entity Kind      | (u8: 1 = category, 2 = post)
//! +------------------+
//! | Entity ID        | (u64 LE)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Payload          | (length-prefixed bytes, JSON)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::checksum::compute_checksum;
use super::errors::{StorageError, StorageResult};
use crate::model::{Category, EntityKind, Post};

/// len + kind + id + tombstone + payload len + checksum
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 1 + 8 + 1 + 4 + 4;

/// Largest payload whose record length still fits the u32 length prefix
pub(crate) const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize - MIN_RECORD_SIZE;

fn check_payload_len(kind: EntityKind, id: u64, len: usize) -> StorageResult<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(StorageError::write_failed_no_source(format!(
            "Payload of {}:{} is {} bytes, limit is {}",
            kind, id, len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// One entry of the append-only record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Table the record belongs to
    pub kind: EntityKind,
    /// Primary key within the table
    pub id: u64,
    /// Whether this is a tombstone (deleted record)
    pub is_tombstone: bool,
    /// JSON body (empty for tombstones)
    pub payload: Vec<u8>,
}

impl StoredRecord {
    /// Encodes a live category record
    pub fn category(category: &Category) -> StorageResult<Self> {
        Self::live(EntityKind::Category, category.id.get(), category)
    }

    /// Encodes a live post record
    pub fn post(post: &Post) -> StorageResult<Self> {
        Self::live(EntityKind::Post, post.id.get(), post)
    }

    /// Creates a tombstone for a deleted record
    pub fn tombstone(kind: EntityKind, id: u64) -> Self {
        Self {
            kind,
            id,
            is_tombstone: true,
            payload: Vec::new(),
        }
    }

    fn live<T: Serialize>(kind: EntityKind, id: u64, value: &T) -> StorageResult<Self> {
        let payload = serde_json::to_vec(value).map_err(|e| {
            StorageError::write_failed_no_source(format!(
                "Failed to encode {} {}: {}",
                kind, id, e
            ))
        })?;
        check_payload_len(kind, id, payload.len())?;
        Ok(Self {
            kind,
            id,
            is_tombstone: false,
            payload,
        })
    }

    /// Rejects a payload too large for the record framing
    pub fn check_size(&self) -> StorageResult<()> {
        check_payload_len(self.kind, self.id, self.payload.len())
    }

    /// Human-readable key such as `post:12`
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }

    /// Decodes the payload of a live category record
    pub fn decode_category(&self) -> StorageResult<Category> {
        self.decode(EntityKind::Category)
    }

    /// Decodes the payload of a live post record
    pub fn decode_post(&self) -> StorageResult<Post> {
        self.decode(EntityKind::Post)
    }

    fn decode<T: DeserializeOwned>(&self, expected: EntityKind) -> StorageResult<T> {
        if self.kind != expected || self.is_tombstone {
            return Err(StorageError::corruption_for_record(
                &self.key(),
                format!("Expected live {} record", expected),
            ));
        }
        serde_json::from_slice(&self.payload).map_err(|e| {
            StorageError::corruption_for_record(&self.key(), format!("Invalid payload: {}", e))
        })
    }

    /// Serialize the record body (everything except length prefix and checksum).
    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 8 + 1 + 4 + self.payload.len());

        buf.push(self.kind.tag());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.push(if self.is_tombstone { 1 } else { 0 });

        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);

        buf
    }

    /// Serialize the complete record to bytes.
    ///
    /// Lengths are only exact for records that pass [`check_size`](Self::check_size).
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();

        // Record length = 4 (length) + body.len() + 4 (checksum)
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        // Checksum covers: length + body
        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[0..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let mut kind_buf = [0u8; 1];
        cursor.read_exact(&mut kind_buf)?;
        let kind = EntityKind::from_tag(kind_buf[0]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown entity kind: {}", kind_buf[0]),
            )
        })?;

        let mut id_buf = [0u8; 8];
        cursor.read_exact(&mut id_buf)?;
        let id = u64::from_le_bytes(id_buf);

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;
        let is_tombstone = tombstone_buf[0] != 0;

        let mut len_buf = [0u8; 4];
        cursor.read_exact(&mut len_buf)?;
        let payload_len = u32::from_le_bytes(len_buf) as usize;
        let mut payload = vec![0u8; payload_len];
        cursor.read_exact(&mut payload)?;

        if cursor.position() as usize != checksum_offset - 4 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Trailing bytes inside record",
            ));
        }

        Ok((
            Self {
                kind,
                id,
                is_tombstone,
                payload,
            },
            record_length,
        ))
    }
}
