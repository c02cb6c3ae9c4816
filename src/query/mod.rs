//! Query engine for quilldb
//!
//! Produces an ordered sequence of posts from a read-only snapshot.
//!
//! # Execution Flow (strict order)
//!
//! 1. Request a snapshot of all posts from the source
//! 2. Keep posts matching the filter (linear scan, no index)
//! 3. Sort by the requested order
//!
//! Queries never mutate anything and hold no state between calls.

mod engine;
mod filter;
mod sorter;

pub use engine::{PostSource, QueryEngine, QueryResult};
pub use filter::{PostFilter, PredicateFilter};
pub use sorter::{PostSorter, SortOrder};
