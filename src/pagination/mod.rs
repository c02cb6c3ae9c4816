//! Pagination engine for quilldb
//!
//! Slices an ordered result set into fixed-size pages. Out-of-range page
//! numbers degrade to empty pages; only a zero page number or page size is
//! an error.

mod page;
mod paginator;

pub use page::{Page, PageRequest};
pub use paginator::paginate;

/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: usize = 5;
