//! Post filters

use serde::{Deserialize, Serialize};

use crate::model::{CategoryId, Post};

/// Selection predicate for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PostFilter {
    /// Every post
    All,
    /// Posts whose `category_id` equals the id
    ByCategory(CategoryId),
    /// Posts whose title or body contains the term, ignoring case.
    /// An empty term matches everything.
    BySearchTerm(String),
}

impl PostFilter {
    pub fn search(term: impl Into<String>) -> Self {
        PostFilter::BySearchTerm(term.into())
    }
}

/// A filter prepared for evaluation against many posts
#[derive(Debug, Clone)]
pub enum PredicateFilter {
    MatchAll,
    Category(CategoryId),
    /// Lowercased needle
    Contains(String),
}

impl PredicateFilter {
    pub fn new(filter: &PostFilter) -> Self {
        match filter {
            PostFilter::All => PredicateFilter::MatchAll,
            PostFilter::ByCategory(id) => PredicateFilter::Category(*id),
            PostFilter::BySearchTerm(term) if term.is_empty() => PredicateFilter::MatchAll,
            PostFilter::BySearchTerm(term) => PredicateFilter::Contains(term.to_lowercase()),
        }
    }

    /// Checks if a post matches
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PredicateFilter::MatchAll => true,
            PredicateFilter::Category(id) => post.category_id == Some(*id),
            PredicateFilter::Contains(needle) => post.contains_lowercase(needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostId;
    use chrono::Utc;

    fn make_post(id: u64, title: &str, body: &str, category: Option<u64>) -> Post {
        Post {
            id: PostId(id),
            title: title.to_string(),
            body: body.to_string(),
            category_id: category.map(CategoryId),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let post = make_post(1, "Flask Basics", "Routes and views", None);
        assert!(PredicateFilter::new(&PostFilter::search("flask")).matches(&post));
        assert!(PredicateFilter::new(&PostFilter::search("ROUTES")).matches(&post));
        assert!(!PredicateFilter::new(&PostFilter::search("django")).matches(&post));
    }

    #[test]
    fn test_search_matches_body_only() {
        let post = make_post(1, "Intro", "Databases are like spreadsheets", None);
        assert!(PredicateFilter::new(&PostFilter::search("spreadsheet")).matches(&post));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let filter = PredicateFilter::new(&PostFilter::search(""));
        assert!(matches!(filter, PredicateFilter::MatchAll));
    }

    #[test]
    fn test_whitespace_term_is_a_real_term() {
        let filter = PredicateFilter::new(&PostFilter::search(" "));
        assert!(!filter.matches(&make_post(1, "one", "word", None)));
        assert!(filter.matches(&make_post(2, "two words", "x", None)));
    }

    #[test]
    fn test_category_filter() {
        let filter = PredicateFilter::new(&PostFilter::ByCategory(CategoryId(2)));
        assert!(filter.matches(&make_post(1, "a", "b", Some(2))));
        assert!(!filter.matches(&make_post(2, "a", "b", Some(3))));
        assert!(!filter.matches(&make_post(3, "a", "b", None)));
    }
}
