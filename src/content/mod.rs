//! Content service for quilldb
//!
//! The public operation surface. Writes go to the record store, reads go
//! through the query engine and then the paginator.

mod errors;
mod sample;
mod service;

pub use errors::{ContentError, ContentResult, ErrorKind};
pub use service::{
    CategorySummary, ContentService, ServiceOptions, StoreStats, DEFAULT_MAX_PAGE_SIZE,
};
