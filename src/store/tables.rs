//! In-memory tables rebuilt from the record log

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::integrity::CategoryLookup;
use crate::model::{Category, CategoryId, EntityKind, Post, PostId};
use crate::storage::{StorageError, StorageResult, StoredRecord};

/// Canonical state of both tables.
///
/// Maps are keyed by id, so iteration order is insertion order.
#[derive(Debug)]
pub(crate) struct Tables {
    pub categories: BTreeMap<CategoryId, Category>,
    pub posts: BTreeMap<PostId, Post>,
    next_category_id: u64,
    next_post_id: u64,
    last_created_at: Option<DateTime<Utc>>,
}

impl Tables {
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
            posts: BTreeMap::new(),
            next_category_id: 1,
            next_post_id: 1,
            last_created_at: None,
        }
    }

    /// Rebuilds the tables by applying records oldest first.
    ///
    /// Latest record per `(kind, id)` wins; tombstones remove. Tombstoned ids
    /// still advance the id counters. The result is checked against the
    /// uniqueness and reference constraints.
    pub fn replay(records: &[StoredRecord]) -> StorageResult<Self> {
        let mut tables = Self::empty();

        for record in records {
            match record.kind {
                EntityKind::Category => {
                    let id = CategoryId(record.id);
                    if record.is_tombstone {
                        tables.categories.remove(&id);
                    } else {
                        let category = record.decode_category()?;
                        Self::check_key(record, category.id.get())?;
                        tables.categories.insert(id, category);
                    }
                    tables.next_category_id = tables.next_category_id.max(record.id + 1);
                }
                EntityKind::Post => {
                    let id = PostId(record.id);
                    if record.is_tombstone {
                        tables.posts.remove(&id);
                    } else {
                        let post = record.decode_post()?;
                        Self::check_key(record, post.id.get())?;
                        tables.observe_created_at(post.created_at);
                        tables.posts.insert(id, post);
                    }
                    tables.next_post_id = tables.next_post_id.max(record.id + 1);
                }
            }
        }

        tables.verify_constraints()?;
        Ok(tables)
    }

    fn check_key(record: &StoredRecord, payload_id: u64) -> StorageResult<()> {
        if payload_id != record.id {
            return Err(StorageError::corruption_for_record(
                &record.key(),
                format!("Payload id {} does not match record id", payload_id),
            ));
        }
        Ok(())
    }

    fn verify_constraints(&self) -> StorageResult<()> {
        let mut names = HashSet::new();
        for category in self.categories.values() {
            if !names.insert(category.name.as_str()) {
                return Err(StorageError::corruption_for_record(
                    &format!("category:{}", category.id),
                    format!("Duplicate category name: {}", category.name),
                ));
            }
        }

        for post in self.posts.values() {
            if let Some(category_id) = post.category_id {
                if !self.categories.contains_key(&category_id) {
                    return Err(StorageError::corruption_for_record(
                        &format!("post:{}", post.id),
                        format!("Dangling category reference: {}", category_id),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Id the next category will get
    pub fn peek_category_id(&self) -> CategoryId {
        CategoryId(self.next_category_id)
    }

    /// Id the next post will get
    pub fn peek_post_id(&self) -> PostId {
        PostId(self.next_post_id)
    }

    /// Clamps `now` so creation times never go backwards relative to ids
    pub fn creation_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        }
    }

    pub fn insert_category(&mut self, category: Category) {
        self.next_category_id = self.next_category_id.max(category.id.get() + 1);
        self.categories.insert(category.id, category);
    }

    pub fn insert_post(&mut self, post: Post) {
        self.next_post_id = self.next_post_id.max(post.id.get() + 1);
        self.observe_created_at(post.created_at);
        self.posts.insert(post.id, post);
    }

    fn observe_created_at(&mut self, created_at: DateTime<Utc>) {
        if self.last_created_at.map_or(true, |last| created_at > last) {
            self.last_created_at = Some(created_at);
        }
    }

    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.values().find(|c| c.name == name)
    }

    /// Ids of posts referencing the category, in id order
    pub fn post_ids_in_category(&self, category_id: CategoryId) -> Vec<PostId> {
        self.posts
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .map(|p| p.id)
            .collect()
    }
}

impl CategoryLookup for Tables {
    fn category_exists(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    fn posts_in_category(&self, id: CategoryId) -> usize {
        self.posts
            .values()
            .filter(|p| p.category_id == Some(id))
            .count()
    }
}
