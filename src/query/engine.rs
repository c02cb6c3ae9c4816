//! Query execution over record store snapshots

use super::filter::{PostFilter, PredicateFilter};
use super::sorter::{PostSorter, SortOrder};
use crate::content::ContentResult;
use crate::model::Post;
use crate::store::RecordStore;

/// Supplies read-only snapshots of all posts
pub trait PostSource {
    /// All posts in insertion order. The caller owns the returned copies.
    fn snapshot_posts(&self) -> ContentResult<Vec<Post>>;
}

impl PostSource for RecordStore {
    fn snapshot_posts(&self) -> ContentResult<Vec<Post>> {
        self.list_all_posts()
    }
}

/// Result of a query
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Matching posts in result order
    pub posts: Vec<Post>,
    /// Number of posts examined
    pub scanned_count: usize,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Stateless query engine bound to a post source
pub struct QueryEngine<'a, S: PostSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: PostSource + ?Sized> QueryEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Runs a query against a fresh snapshot.
    ///
    /// A category filter naming a category with no posts (or no category at
    /// all) yields an empty result, not an error.
    pub fn query(&self, filter: &PostFilter, order: SortOrder) -> ContentResult<QueryResult> {
        let snapshot = self.source.snapshot_posts()?;
        Ok(Self::execute(snapshot, filter, order))
    }

    /// Filters and sorts an already-taken snapshot
    pub fn execute(snapshot: Vec<Post>, filter: &PostFilter, order: SortOrder) -> QueryResult {
        let predicate = PredicateFilter::new(filter);
        let scanned_count = snapshot.len();

        let mut posts: Vec<Post> = snapshot
            .into_iter()
            .filter(|post| predicate.matches(post))
            .collect();
        PostSorter::sort(&mut posts, order);

        QueryResult {
            posts,
            scanned_count,
        }
    }
}
