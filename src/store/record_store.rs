//! The record store: canonical tables plus the durable log behind them

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::clock::{Clock, SystemClock};
use super::tables::Tables;
use super::DeletePolicy;
use crate::content::{ContentError, ContentResult};
use crate::integrity;
use crate::model::{Category, CategoryId, EntityKind, NewPost, Post, PostId, PostPatch};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{MemoryLog, RecordLog, StorageError, StorageWriter, StoredRecord};

struct StoreState {
    log: Box<dyn RecordLog>,
    tables: Tables,
}

impl StoreState {
    /// Persists a record. The tables must only change after this succeeds.
    fn persist(&mut self, record: &StoredRecord) -> ContentResult<()> {
        self.log.append(record).map_err(|e| {
            let key = record.key();
            log_event_with_fields(
                Event::StorageFailure,
                &[("record", key.as_str()), ("code", e.code().code())],
            );
            ContentError::from(e)
        })
    }
}

/// Durable keyed storage for categories and posts.
///
/// Safe to share across threads (`Arc<RecordStore>`); every method takes `&self`.
pub struct RecordStore {
    state: RwLock<StoreState>,
    clock: Box<dyn Clock>,
}

impl RecordStore {
    /// Opens (or creates) a file-backed store under `data_dir` and replays it.
    pub fn open(data_dir: &Path) -> ContentResult<Self> {
        let writer = StorageWriter::open(data_dir)?;
        Self::with_log(Box::new(writer))
    }

    /// Creates an empty store that keeps records in memory only.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(StoreState {
                log: Box::new(MemoryLog::new()),
                tables: Tables::empty(),
            }),
            clock: Box::new(SystemClock),
        }
    }

    /// Builds a store over any record log, replaying what it already holds.
    pub fn with_log(mut log: Box<dyn RecordLog>) -> ContentResult<Self> {
        let source = log.describe();
        let records = log
            .replay()
            .map_err(|e| report_open_failure(&source, e))?;
        let tables = Tables::replay(&records).map_err(|e| report_open_failure(&source, e))?;

        let record_count = records.len().to_string();
        let category_count = tables.categories.len().to_string();
        let post_count = tables.posts.len().to_string();
        log_event_with_fields(
            Event::StoreOpened,
            &[
                ("log", source.as_str()),
                ("records", record_count.as_str()),
                ("categories", category_count.as_str()),
                ("posts", post_count.as_str()),
            ],
        );

        Ok(Self {
            state: RwLock::new(StoreState { log, tables }),
            clock: Box::new(SystemClock),
        })
    }

    /// Replaces the time source used for `created_at`
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn read(&self) -> ContentResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| StorageError::lock_poisoned().into())
    }

    fn write(&self) -> ContentResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| StorageError::lock_poisoned().into())
    }

    // Categories

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `name` is empty, `DuplicateName` if it is taken.
    pub fn create_category(&self, name: &str) -> ContentResult<Category> {
        if name.is_empty() {
            return Err(ContentError::empty("name"));
        }

        let mut state = self.write()?;
        if state.tables.find_category_by_name(name).is_some() {
            return Err(ContentError::DuplicateName {
                name: name.to_string(),
            });
        }

        let category = Category::new(state.tables.peek_category_id(), name);
        state.persist(&StoredRecord::category(&category)?)?;
        state.tables.insert_category(category.clone());

        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> ContentResult<Category> {
        self.read()?
            .tables
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::not_found(EntityKind::Category, id.get()))
    }

    /// Looks a category up by exact name
    pub fn find_category_by_name(&self, name: &str) -> ContentResult<Option<Category>> {
        Ok(self.read()?.tables.find_category_by_name(name).cloned())
    }

    /// All categories in id order
    pub fn list_categories(&self) -> ContentResult<Vec<Category>> {
        Ok(self.read()?.tables.categories.values().cloned().collect())
    }

    /// All categories in id order, each with the number of posts referencing it
    pub fn category_post_counts(&self) -> ContentResult<Vec<(Category, usize)>> {
        let state = self.read()?;
        let mut counts: std::collections::HashMap<CategoryId, usize> =
            std::collections::HashMap::new();
        for category_id in state.tables.posts.values().filter_map(|p| p.category_id) {
            *counts.entry(category_id).or_insert(0) += 1;
        }

        Ok(state
            .tables
            .categories
            .values()
            .map(|c| (c.clone(), counts.get(&c.id).copied().unwrap_or(0)))
            .collect())
    }

    /// Returns true if any post references the category
    pub fn category_has_posts(&self, id: CategoryId) -> ContentResult<bool> {
        Ok(integrity::category_has_posts(&self.read()?.tables, id))
    }

    /// Deletes a category.
    ///
    /// Under `DeletePolicy::Block` a referenced category fails with
    /// `CategoryInUse`. Under `DeletePolicy::Cascade` the referencing posts
    /// are tombstoned first, then the category. Returns the number of posts
    /// removed.
    pub fn delete_category(&self, id: CategoryId, policy: DeletePolicy) -> ContentResult<usize> {
        let mut state = self.write()?;
        if !state.tables.categories.contains_key(&id) {
            return Err(ContentError::not_found(EntityKind::Category, id.get()));
        }

        let mut removed = 0;
        match policy {
            DeletePolicy::Block => integrity::check_category_unreferenced(&state.tables, id)?,
            DeletePolicy::Cascade => {
                for post_id in state.tables.post_ids_in_category(id) {
                    state.persist(&StoredRecord::tombstone(EntityKind::Post, post_id.get()))?;
                    state.tables.posts.remove(&post_id);
                    removed += 1;
                }
            }
        }

        state.persist(&StoredRecord::tombstone(EntityKind::Category, id.get()))?;
        state.tables.categories.remove(&id);

        Ok(removed)
    }

    // Posts

    /// Creates a post stamped with the current time.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if title or body is empty, `UnknownCategory` if the
    /// reference does not resolve. Nothing is persisted on failure.
    pub fn create_post(&self, new_post: NewPost) -> ContentResult<Post> {
        validate_text("title", &new_post.title)?;
        validate_text("body", &new_post.body)?;

        let mut state = self.write()?;
        integrity::check_category_ref(&state.tables, new_post.category_id)?;

        let post = Post {
            id: state.tables.peek_post_id(),
            title: new_post.title,
            body: new_post.body,
            category_id: new_post.category_id,
            created_at: state.tables.creation_time(self.clock.now()),
        };
        state.persist(&StoredRecord::post(&post)?)?;
        state.tables.insert_post(post.clone());

        Ok(post)
    }

    pub fn get_post(&self, id: PostId) -> ContentResult<Post> {
        self.read()?
            .tables
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentError::not_found(EntityKind::Post, id.get()))
    }

    /// Applies a partial update. `id` and `created_at` never change.
    pub fn update_post(&self, id: PostId, patch: &PostPatch) -> ContentResult<Post> {
        if let Some(ref title) = patch.title {
            validate_text("title", title)?;
        }
        if let Some(ref body) = patch.body {
            validate_text("body", body)?;
        }

        let mut state = self.write()?;
        let current = state
            .tables
            .posts
            .get(&id)
            .ok_or_else(|| ContentError::not_found(EntityKind::Post, id.get()))?;

        let updated = patch.apply_to(current);
        integrity::check_category_ref(&state.tables, updated.category_id)?;

        state.persist(&StoredRecord::post(&updated)?)?;
        state.tables.insert_post(updated.clone());

        Ok(updated)
    }

    /// Deletes a post. A second delete of the same id fails with `NotFound`.
    pub fn delete_post(&self, id: PostId) -> ContentResult<()> {
        let mut state = self.write()?;
        if !state.tables.posts.contains_key(&id) {
            return Err(ContentError::not_found(EntityKind::Post, id.get()));
        }

        state.persist(&StoredRecord::tombstone(EntityKind::Post, id.get()))?;
        state.tables.posts.remove(&id);

        Ok(())
    }

    /// Snapshot of every post in insertion order
    pub fn list_all_posts(&self) -> ContentResult<Vec<Post>> {
        Ok(self.read()?.tables.posts.values().cloned().collect())
    }

    /// `(posts, categories)` currently stored
    pub fn counts(&self) -> ContentResult<(usize, usize)> {
        let state = self.read()?;
        Ok((state.tables.posts.len(), state.tables.categories.len()))
    }
}

fn report_open_failure(source: &str, err: StorageError) -> StorageError {
    let event = if err.is_fatal() {
        Event::DataCorruption
    } else {
        Event::StorageFailure
    };
    let message = err.to_string();
    log_event_with_fields(
        event,
        &[("log", source), ("code", err.code().code()), ("error", message.as_str())],
    );
    err
}

fn validate_text(field: &'static str, value: &str) -> ContentResult<()> {
    if value.is_empty() {
        return Err(ContentError::empty(field));
    }
    Ok(())
}
