//! Record types for quilldb
//!
//! Two fixed-shape entities with a one-to-many relationship:
//!
//! - `Category`: a unique, non-empty name
//! - `Post`: title, body, optional category reference, creation timestamp
//!
//! Ids are system-assigned, strictly increasing per table, and never reused.

mod category;
mod ids;
mod post;

pub use category::Category;
pub use ids::{CategoryId, EntityKind, PostId};
pub use post::{NewPost, Post, PostPatch};
