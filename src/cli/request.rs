//! Requests accepted by `quilldb exec` and their dispatch
//!
//! One request per line, tagged by `op`:
//!
//! ```json
//! {"op": "create_category", "name": "Tech"}
//! {"op": "create_post", "title": "Intro", "body": "...", "category_id": 1}
//! {"op": "edit_post", "id": 1, "patch": {"category_id": null}}
//! {"op": "search_posts", "term": "spread", "page": 1, "page_size": 5}
//! ```

use serde::{Deserialize, Serialize};

use crate::content::{CategorySummary, ContentResult, ContentService, StoreStats};
use crate::model::{Category, CategoryId, NewPost, Post, PostId, PostPatch};
use crate::observability::MetricsSnapshot;
use crate::pagination::{Page, PageRequest};

/// Code returned for a line that is not a valid request
pub const BAD_REQUEST_CODE: &str = "QUILL_BAD_REQUEST";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateCategory {
        name: String,
    },
    GetCategory {
        id: CategoryId,
    },
    FindCategory {
        name: String,
    },
    DeleteCategory {
        id: CategoryId,
    },
    ListCategories {
        #[serde(default)]
        with_counts: bool,
    },
    CreatePost {
        title: String,
        body: String,
        #[serde(default)]
        category_id: Option<CategoryId>,
    },
    GetPost {
        id: PostId,
    },
    EditPost {
        id: PostId,
        #[serde(default)]
        patch: PostPatch,
    },
    DeletePost {
        id: PostId,
    },
    ListPosts {
        #[serde(default)]
        page: Option<usize>,
        #[serde(default)]
        page_size: Option<usize>,
    },
    ListPostsByCategory {
        category_id: CategoryId,
        #[serde(default)]
        page: Option<usize>,
        #[serde(default)]
        page_size: Option<usize>,
    },
    SearchPosts {
        #[serde(default)]
        term: String,
        #[serde(default)]
        page: Option<usize>,
        #[serde(default)]
        page_size: Option<usize>,
    },
    Stats,
    Metrics,
}

/// Successful result of a request, serialized as the `data` field
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Category(Category),
    Categories(Vec<Category>),
    CategorySummaries(Vec<CategorySummary>),
    Post(Post),
    Page(Page<Post>),
    CategoryDeleted { deleted: CategoryId, posts_removed: usize },
    PostDeleted { deleted: PostId },
    Stats(StoreStats),
    Metrics(MetricsSnapshot),
}

impl Request {
    /// Runs the request against the service
    pub fn dispatch(self, service: &ContentService) -> ContentResult<Response> {
        let page_request = |page: Option<usize>, page_size: Option<usize>| {
            PageRequest::new(
                page.unwrap_or(1),
                page_size.unwrap_or(service.options().page_size),
            )
        };

        let response = match self {
            Request::CreateCategory { name } => Response::Category(service.create_category(&name)?),
            Request::GetCategory { id } => Response::Category(service.get_category(id)?),
            Request::FindCategory { name } => {
                Response::Category(service.find_category_by_name(&name)?)
            }
            Request::DeleteCategory { id } => Response::CategoryDeleted {
                posts_removed: service.delete_category(id)?,
                deleted: id,
            },
            Request::ListCategories { with_counts: false } => {
                Response::Categories(service.list_categories()?)
            }
            Request::ListCategories { with_counts: true } => {
                Response::CategorySummaries(service.list_categories_with_counts()?)
            }
            Request::CreatePost {
                title,
                body,
                category_id,
            } => Response::Post(service.create_post(NewPost {
                title,
                body,
                category_id,
            })?),
            Request::GetPost { id } => Response::Post(service.get_post(id)?),
            Request::EditPost { id, patch } => Response::Post(service.edit_post(id, &patch)?),
            Request::DeletePost { id } => {
                service.delete_post(id)?;
                Response::PostDeleted { deleted: id }
            }
            Request::ListPosts { page, page_size } => {
                Response::Page(service.list_posts(page_request(page, page_size))?)
            }
            Request::ListPostsByCategory {
                category_id,
                page,
                page_size,
            } => Response::Page(
                service.list_posts_by_category(category_id, page_request(page, page_size))?,
            ),
            Request::SearchPosts {
                term,
                page,
                page_size,
            } => Response::Page(service.search_posts(&term, page_request(page, page_size))?),
            Request::Stats => Response::Stats(service.stats()?),
            Request::Metrics => Response::Metrics(service.metrics()),
        };
        Ok(response)
    }
}
