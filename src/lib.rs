//! quilldb - an embedded, durable store for categorized posts
//!
//! Two tables (categories, posts) with a nullable foreign key from post to
//! category, kept in one append-only checksummed record file. Reads go
//! through a filter/sort query engine and a paginator.
//!
//! ```ignore
//! use quilldb::content::ContentService;
//! use quilldb::model::NewPost;
//! use quilldb::pagination::PageRequest;
//!
//! let service = ContentService::in_memory();
//! let tech = service.create_category("Tech")?;
//! service.create_post(NewPost::new("Intro", "Databases are like spreadsheets").in_category(tech.id))?;
//! let page = service.search_posts("spreadsheet", PageRequest::first(5))?;
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod integrity;
pub mod model;
pub mod observability;
pub mod pagination;
pub mod query;
pub mod storage;
pub mod store;
