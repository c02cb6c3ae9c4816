use super::page::Page;
use crate::content::{ContentError, ContentResult};

/// Returns page `page_number` (1-based) of `sequence`.
///
/// `total_pages` is `ceil(total_items / page_size)`, minimum 1. A page past
/// the end has no items but is not an error.
///
/// # Errors
///
/// `InvalidInput` if `page_number` or `page_size` is zero.
pub fn paginate<T>(sequence: Vec<T>, page_number: usize, page_size: usize) -> ContentResult<Page<T>> {
    if page_number == 0 {
        return Err(ContentError::invalid("page_number", "must be at least 1"));
    }
    if page_size == 0 {
        return Err(ContentError::invalid("page_size", "must be at least 1"));
    }

    let total_items = sequence.len();
    let total_pages = total_items.div_ceil(page_size).max(1);

    let items = match (page_number - 1).checked_mul(page_size) {
        Some(offset) if offset < total_items => sequence
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect(),
        _ => Vec::new(),
    };

    Ok(Page {
        items,
        page_number,
        page_size,
        total_items,
        total_pages,
        has_previous: page_number > 1,
        has_next: page_number < total_pages,
    })
}
