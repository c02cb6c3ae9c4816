//! Result ordering

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Post;

/// Supported result orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// `created_at` descending, ties broken by `id` descending
    #[default]
    NewestFirst,
    /// `created_at` ascending, ties broken by `id` ascending
    OldestFirst,
}

/// Sorts posts deterministically
pub struct PostSorter;

impl PostSorter {
    pub fn sort(posts: &mut [Post], order: SortOrder) {
        posts.sort_by(|a, b| {
            let ordering = Self::compare_oldest_first(a, b);
            match order {
                SortOrder::OldestFirst => ordering,
                SortOrder::NewestFirst => ordering.reverse(),
            }
        });
    }

    fn compare_oldest_first(a: &Post, b: &Post) -> Ordering {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}
