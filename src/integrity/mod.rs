//! Referential integrity rules
//!
//! Pure checks with no state of their own. The record store implements
//! `CategoryLookup` over its tables and calls these on every post write and
//! on category deletion.

use crate::content::{ContentError, ContentResult};
use crate::model::CategoryId;

/// Existence queries the integrity rules need from the store
pub trait CategoryLookup {
    /// Returns true if a category with this id exists
    fn category_exists(&self, id: CategoryId) -> bool;

    /// Number of posts whose `category_id` is `id`
    fn posts_in_category(&self, id: CategoryId) -> usize;
}

/// Validates a post's category reference.
///
/// `None` (uncategorized) always passes.
pub fn check_category_ref<L: CategoryLookup + ?Sized>(
    lookup: &L,
    category_id: Option<CategoryId>,
) -> ContentResult<()> {
    match category_id {
        Some(id) if !lookup.category_exists(id) => {
            Err(ContentError::UnknownCategory { category_id: id })
        }
        _ => Ok(()),
    }
}

/// Returns true if at least one post references the category
pub fn category_has_posts<L: CategoryLookup + ?Sized>(lookup: &L, category_id: CategoryId) -> bool {
    lookup.posts_in_category(category_id) > 0
}

/// Fails with `CategoryInUse` if any post still references the category
pub fn check_category_unreferenced<L: CategoryLookup + ?Sized>(
    lookup: &L,
    category_id: CategoryId,
) -> ContentResult<()> {
    let post_count = lookup.posts_in_category(category_id);
    if post_count > 0 {
        return Err(ContentError::CategoryInUse {
            category_id,
            post_count,
        });
    }
    Ok(())
}
