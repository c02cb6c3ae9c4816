//! Content error taxonomy
//!
//! Every public operation either succeeds or returns exactly one of these
//! kinds. Only `StorageUnavailable` is worth retrying.

use std::fmt;

use thiserror::Error;

use crate::model::{CategoryId, EntityKind};
use crate::storage::StorageError;

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Content errors
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: u64 },

    #[error("category not found: {name:?}")]
    CategoryNameNotFound { name: String },

    #[error("category name already in use: {name}")]
    DuplicateName { name: String },

    #[error("unknown category: {category_id}")]
    UnknownCategory { category_id: CategoryId },

    #[error("category {category_id} is still referenced by {post_count} post(s)")]
    CategoryInUse {
        category_id: CategoryId,
        post_count: usize,
    },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}

/// Fieldless view of `ContentError` for matching and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    DuplicateName,
    UnknownCategory,
    CategoryInUse,
    StorageUnavailable,
}

impl ErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "QUILL_INVALID_INPUT",
            ErrorKind::NotFound => "QUILL_NOT_FOUND",
            ErrorKind::DuplicateName => "QUILL_DUPLICATE_NAME",
            ErrorKind::UnknownCategory => "QUILL_UNKNOWN_CATEGORY",
            ErrorKind::CategoryInUse => "QUILL_CATEGORY_IN_USE",
            ErrorKind::StorageUnavailable => "QUILL_STORAGE_UNAVAILABLE",
        }
    }

    /// HTTP-style status a presentation layer should report
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateName => 409,
            ErrorKind::UnknownCategory => 422,
            ErrorKind::CategoryInUse => 409,
            ErrorKind::StorageUnavailable => 503,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ContentError {
    /// Create an invalid input error for a named field
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Create an empty-field error
    pub fn empty(field: &'static str) -> Self {
        Self::invalid(field, "must not be empty")
    }

    /// Create a not found error
    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns the fieldless kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } | Self::CategoryNameNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::UnknownCategory { .. } => ErrorKind::UnknownCategory,
            Self::CategoryInUse { .. } => ErrorKind::CategoryInUse,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// HTTP-style status code
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Whether retrying after a delay could succeed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StorageUnavailable
    }
}
