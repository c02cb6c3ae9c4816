//! Query and Pagination Tests
//!
//! - Listing returns every post once, newest first
//! - Search spans title and body, case-insensitively
//! - Pages never fail for an out-of-range page number

use chrono::{Duration, TimeZone, Utc};
use quilldb::content::{ContentService, ErrorKind, ServiceOptions};
use quilldb::model::{NewPost, Post};
use quilldb::pagination::{paginate, PageRequest};
use quilldb::query::{PostFilter, QueryEngine, SortOrder};
use quilldb::store::{FixedClock, RecordStore};

fn service_with_posts(count: usize) -> (ContentService, Vec<Post>) {
    let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let store = RecordStore::in_memory()
        .with_clock(Box::new(FixedClock::stepping(start, Duration::hours(1))));
    let service = ContentService::new(store, ServiceOptions::default());

    let posts = (0..count)
        .map(|i| {
            service
                .create_post(NewPost::new(format!("Post {}", i), format!("body {}", i)))
                .unwrap()
        })
        .collect();
    (service, posts)
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_listing_is_complete_and_newest_first() {
    let (service, posts) = service_with_posts(12);

    let page = service.list_posts(PageRequest::first(50)).unwrap();
    let mut expected = posts;
    expected.reverse();
    assert_eq!(page.items, expected);

    for pair in page.items.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[test]
fn test_same_timestamp_ties_break_by_id() {
    let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let store = RecordStore::in_memory().with_clock(Box::new(FixedClock::frozen(at)));
    let a = store.create_post(NewPost::new("a", "x")).unwrap();
    let b = store.create_post(NewPost::new("b", "x")).unwrap();

    let newest = QueryEngine::new(&store)
        .query(&PostFilter::All, SortOrder::NewestFirst)
        .unwrap();
    assert_eq!(newest.posts, vec![b.clone(), a.clone()]);

    let oldest = QueryEngine::new(&store)
        .query(&PostFilter::All, SortOrder::OldestFirst)
        .unwrap();
    assert_eq!(oldest.posts, vec![a, b]);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_matches_body_only_post() {
    let (service, _) = service_with_posts(0);
    let hidden = service
        .create_post(NewPost::new("Weekend notes", "Learned about Foreign Keys"))
        .unwrap();
    service
        .create_post(NewPost::new("Keys to success", "practice"))
        .unwrap();

    let page = service
        .search_posts("foreign key", PageRequest::first(5))
        .unwrap();
    assert_eq!(page.items, vec![hidden]);
}

#[test]
fn test_search_counts_each_post_once() {
    let (service, _) = service_with_posts(0);
    let both = service
        .create_post(NewPost::new("rust", "rust everywhere"))
        .unwrap();

    let page = service.search_posts("RUST", PageRequest::first(5)).unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items, vec![both]);
}

#[test]
fn test_empty_search_equals_listing() {
    let (service, _) = service_with_posts(7);
    for page_number in 1..=3 {
        let request = PageRequest::new(page_number, 3);
        assert_eq!(
            service.search_posts("", request).unwrap(),
            service.list_posts(request).unwrap()
        );
    }
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn test_twelve_posts_page_boundaries() {
    let (service, _) = service_with_posts(12);

    let first = service.list_posts(PageRequest::new(1, 5)).unwrap();
    assert_eq!(first.len(), 5);
    assert!(first.has_next);
    assert!(!first.has_previous);
    assert_eq!(first.total_pages, 3);

    let last = service.list_posts(PageRequest::new(3, 5)).unwrap();
    assert_eq!(last.len(), 2);
    assert!(!last.has_next);
    assert!(last.has_previous);

    let beyond = service.list_posts(PageRequest::new(99, 5)).unwrap();
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_items, 12);
}

#[test]
fn test_pages_partition_the_listing() {
    let (service, posts) = service_with_posts(12);

    let mut collected = Vec::new();
    let mut request = Some(PageRequest::new(1, 5));
    while let Some(current) = request {
        let page = service.list_posts(current).unwrap();
        request = page.next_page().map(|n| PageRequest::new(n, 5));
        collected.extend(page.items);
    }

    let mut expected = posts;
    expected.reverse();
    assert_eq!(collected, expected);
}

#[test]
fn test_empty_store_has_one_empty_page() {
    let (service, _) = service_with_posts(0);
    let page = service.list_posts(PageRequest::first(5)).unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next);
    assert!(!page.has_previous);
}

#[test]
fn test_non_positive_page_parameters_rejected() {
    let (service, _) = service_with_posts(3);
    assert_eq!(
        service.list_posts(PageRequest::new(0, 5)).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(
        service.search_posts("x", PageRequest::new(1, 0)).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert!(paginate(vec![1, 2, 3], 1, 0).is_err());
}

#[test]
fn test_navigation_window() {
    let page = paginate((1..=100).collect::<Vec<u32>>(), 5, 5).unwrap();
    assert_eq!(page.total_pages, 20);
    assert_eq!(
        page.page_numbers(),
        vec![
            Some(1),
            Some(2),
            Some(3),
            Some(4),
            Some(5),
            Some(6),
            Some(7),
            None,
            Some(19),
            Some(20)
        ]
    );
}
