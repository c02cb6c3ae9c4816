//! Record store for quilldb
//!
//! Owns the canonical copies of every `Category` and `Post`, assigns ids and
//! timestamps, and persists each write through a `RecordLog` before the
//! in-memory tables change.
//!
//! # Concurrency
//!
//! The whole store sits behind one `RwLock`: writes are serialized, reads run
//! concurrently and always see a fully applied state. Readers receive cloned
//! snapshots and never hold references into the tables.

mod clock;
mod record_store;
mod tables;

use serde::{Deserialize, Serialize};

pub use clock::{Clock, FixedClock, SystemClock};
pub use record_store::RecordStore;

/// What `delete_category` does when posts still reference the category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse with `CategoryInUse`
    #[default]
    Block,
    /// Delete the referencing posts first, then the category
    Cascade,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Block => "block",
            DeletePolicy::Cascade => "cascade",
        }
    }
}
