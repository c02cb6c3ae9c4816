//! The content service facade

use std::sync::Arc;

use serde::Serialize;

use super::errors::{ContentError, ContentResult, ErrorKind};
use super::sample::{SAMPLE_CATEGORIES, SAMPLE_POSTS};
use crate::model::{Category, CategoryId, NewPost, Post, PostId, PostPatch};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot};
use crate::pagination::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE};
use crate::query::{PostFilter, QueryEngine, SortOrder};
use crate::store::{DeletePolicy, RecordStore};

/// Default upper bound on a requested page size
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Per-service behavior knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Page size used when a caller does not pick one
    pub page_size: usize,
    pub max_page_size: usize,
    pub delete_policy: DeletePolicy,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            delete_policy: DeletePolicy::Block,
        }
    }
}

/// A category with the number of posts filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    #[serde(flatten)]
    pub category: Category,
    pub post_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_posts: usize,
    pub total_categories: usize,
}

/// Entry point for every caller.
///
/// Holds no per-call state; the record store is the only stateful part.
/// Cloning the `Arc<RecordStore>` into several services is allowed, each gets
/// its own metrics.
pub struct ContentService {
    store: Arc<RecordStore>,
    options: ServiceOptions,
    metrics: MetricsRegistry,
}

impl ContentService {
    pub fn new(store: RecordStore, options: ServiceOptions) -> Self {
        Self::shared(Arc::new(store), options)
    }

    pub fn shared(store: Arc<RecordStore>, options: ServiceOptions) -> Self {
        Self {
            store,
            options,
            metrics: MetricsRegistry::new(),
        }
    }

    /// Service over an ephemeral store with default options
    pub fn in_memory() -> Self {
        Self::new(RecordStore::in_memory(), ServiceOptions::default())
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// A first-page request at the configured page size
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.options.page_size)
    }

    // Categories

    pub fn create_category(&self, name: &str) -> ContentResult<Category> {
        let category = self.observe_write("create_category", self.store.create_category(name))?;

        self.metrics.increment_categories_created();
        let id = category.id.to_string();
        log_event_with_fields(
            Event::CategoryCreated,
            &[("category_id", id.as_str()), ("name", category.name.as_str())],
        );
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> ContentResult<Category> {
        self.store.get_category(id)
    }

    /// Exact, case-sensitive name lookup
    pub fn find_category_by_name(&self, name: &str) -> ContentResult<Category> {
        self.store
            .find_category_by_name(name)?
            .ok_or_else(|| ContentError::CategoryNameNotFound {
                name: name.to_string(),
            })
    }

    /// Deletes a category under the configured delete policy.
    ///
    /// Returns the number of posts removed along with it, always 0 under
    /// `DeletePolicy::Block`.
    pub fn delete_category(&self, id: CategoryId) -> ContentResult<usize> {
        let policy = self.options.delete_policy;
        let removed = self.observe_write(
            "delete_category",
            self.store.delete_category(id, policy),
        )?;

        self.metrics.increment_categories_deleted();
        self.metrics.add_posts_deleted(removed as u64);

        let id = id.to_string();
        let removed_str = removed.to_string();
        if removed > 0 {
            log_event_with_fields(
                Event::CascadeDelete,
                &[("category_id", id.as_str()), ("posts", removed_str.as_str())],
            );
        }
        log_event_with_fields(
            Event::CategoryDeleted,
            &[
                ("category_id", id.as_str()),
                ("policy", policy.as_str()),
                ("posts_removed", removed_str.as_str()),
            ],
        );
        Ok(removed)
    }

    /// All categories sorted by name
    pub fn list_categories(&self) -> ContentResult<Vec<Category>> {
        let mut categories = self.store.list_categories()?;
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    /// All categories sorted by name, each with its post count
    pub fn list_categories_with_counts(&self) -> ContentResult<Vec<CategorySummary>> {
        let mut summaries: Vec<CategorySummary> = self
            .store
            .category_post_counts()?
            .into_iter()
            .map(|(category, post_count)| CategorySummary {
                category,
                post_count,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.category
                .name
                .cmp(&b.category.name)
                .then(a.category.id.cmp(&b.category.id))
        });
        Ok(summaries)
    }

    // Posts

    pub fn create_post(&self, new_post: NewPost) -> ContentResult<Post> {
        let post = self.observe_write("create_post", self.store.create_post(new_post))?;

        self.metrics.increment_posts_created();
        let id = post.id.to_string();
        let category = category_field(post.category_id);
        log_event_with_fields(
            Event::PostCreated,
            &[("post_id", id.as_str()), ("category_id", category.as_str())],
        );
        Ok(post)
    }

    pub fn get_post(&self, id: PostId) -> ContentResult<Post> {
        self.store.get_post(id)
    }

    /// Partial update; omitted fields keep their values
    pub fn edit_post(&self, id: PostId, patch: &PostPatch) -> ContentResult<Post> {
        let post = self.observe_write("edit_post", self.store.update_post(id, patch))?;

        self.metrics.increment_posts_updated();
        let id = post.id.to_string();
        log_event_with_fields(Event::PostUpdated, &[("post_id", id.as_str())]);
        Ok(post)
    }

    pub fn delete_post(&self, id: PostId) -> ContentResult<()> {
        self.observe_write("delete_post", self.store.delete_post(id))?;

        self.metrics.add_posts_deleted(1);
        let id = id.to_string();
        log_event_with_fields(Event::PostDeleted, &[("post_id", id.as_str())]);
        Ok(())
    }

    // Reads

    /// Every post, newest first
    pub fn list_posts(&self, request: PageRequest) -> ContentResult<Page<Post>> {
        self.paged_query(&PostFilter::All, request)
    }

    /// Posts filed under a category, newest first. An unknown category gives
    /// an empty page.
    pub fn list_posts_by_category(
        &self,
        category_id: CategoryId,
        request: PageRequest,
    ) -> ContentResult<Page<Post>> {
        self.paged_query(&PostFilter::ByCategory(category_id), request)
    }

    /// Case-insensitive substring search over title and body. An empty term
    /// matches every post.
    pub fn search_posts(&self, term: &str, request: PageRequest) -> ContentResult<Page<Post>> {
        self.paged_query(&PostFilter::search(term), request)
    }

    pub fn stats(&self) -> ContentResult<StoreStats> {
        let (total_posts, total_categories) = self.store.counts()?;
        Ok(StoreStats {
            total_posts,
            total_categories,
        })
    }

    /// Fills an empty store with starter categories and posts.
    ///
    /// Returns false, writing nothing, when any category already exists.
    pub fn seed_sample_content(&self) -> ContentResult<bool> {
        let (_, category_count) = self.store.counts()?;
        if category_count > 0 {
            return Ok(false);
        }

        let mut ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
        for name in SAMPLE_CATEGORIES {
            ids.push(self.create_category(name)?.id);
        }
        for &(title, body, category) in SAMPLE_POSTS {
            let mut new_post = NewPost::new(title, body);
            if let Some(&id) = ids.get(category) {
                new_post = new_post.in_category(id);
            }
            self.create_post(new_post)?;
        }

        let categories = SAMPLE_CATEGORIES.len().to_string();
        let posts = SAMPLE_POSTS.len().to_string();
        log_event_with_fields(
            Event::StoreSeeded,
            &[("categories", categories.as_str()), ("posts", posts.as_str())],
        );
        Ok(true)
    }

    fn paged_query(&self, filter: &PostFilter, request: PageRequest) -> ContentResult<Page<Post>> {
        self.check_page_request(request)?;

        let result = QueryEngine::new(self.store.as_ref()).query(filter, SortOrder::NewestFirst)?;
        self.metrics.increment_queries_executed();

        let filter_name = filter_name(filter);
        let scanned = result.scanned_count.to_string();
        let matched = result.len().to_string();
        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("filter", filter_name),
                ("matched", matched.as_str()),
                ("scanned", scanned.as_str()),
            ],
        );

        paginate(result.posts, request.page_number, request.page_size)
    }

    fn check_page_request(&self, request: PageRequest) -> ContentResult<()> {
        if request.page_number == 0 {
            return Err(ContentError::invalid("page_number", "must be a positive integer"));
        }
        if request.page_size == 0 {
            return Err(ContentError::invalid("page_size", "must be a positive integer"));
        }
        if request.page_size > self.options.max_page_size {
            return Err(ContentError::invalid(
                "page_size",
                format!("must not exceed {}", self.options.max_page_size),
            ));
        }
        Ok(())
    }

    /// Counts and logs a failed write, passing the result through untouched
    fn observe_write<T>(&self, operation: &str, result: ContentResult<T>) -> ContentResult<T> {
        if let Err(ref err) = result {
            if err.kind() == ErrorKind::StorageUnavailable {
                self.metrics.increment_storage_failures();
            } else {
                self.metrics.increment_writes_rejected();
                let message = err.to_string();
                log_event_with_fields(
                    Event::WriteRejected,
                    &[
                        ("operation", operation),
                        ("code", err.code()),
                        ("reason", message.as_str()),
                    ],
                );
            }
        }
        result
    }
}

fn category_field(category_id: Option<CategoryId>) -> String {
    category_id.map_or_else(|| "none".to_string(), |id| id.to_string())
}

fn filter_name(filter: &PostFilter) -> &'static str {
    match filter {
        PostFilter::All => "all",
        PostFilter::ByCategory(_) => "by_category",
        PostFilter::BySearchTerm(_) => "by_search_term",
    }
}
