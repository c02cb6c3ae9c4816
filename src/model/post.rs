//! Post record and its write-side inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, PostId};

/// A stored text document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// `None` means uncategorized
    pub category_id: Option<CategoryId>,
    /// Assigned by the store at creation, never changed afterwards
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Case-insensitive substring test over title and body.
    ///
    /// `needle` must already be lowercased.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category_id: None,
        }
    }

    /// Sets the category reference
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Partial update for a post.
///
/// Omitted fields keep their prior value. `category_id` is doubly optional:
/// `None` leaves the reference alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.category_id.is_none()
    }

    /// Applies the patch to a copy of `post`. `id` and `created_at` are kept.
    pub fn apply_to(&self, post: &Post) -> Post {
        Post {
            id: post.id,
            title: self.title.clone().unwrap_or_else(|| post.title.clone()),
            body: self.body.clone().unwrap_or_else(|| post.body.clone()),
            category_id: self.category_id.unwrap_or(post.category_id),
            created_at: post.created_at,
        }
    }
}

/// Distinguishes an absent key from an explicit `null` for `category_id`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            id: PostId(1),
            title: "Intro".to_string(),
            body: "Databases are like spreadsheets".to_string(),
            category_id: Some(CategoryId(3)),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_contains_spans_title_and_body() {
        let post = sample_post();
        assert!(post.contains_lowercase("intro"));
        assert!(post.contains_lowercase("spreadsheet"));
        assert!(!post.contains_lowercase("flask"));
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let post = sample_post();
        let updated = PostPatch::new().title("Renamed").apply_to(&post);

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.body, post.body);
        assert_eq!(updated.category_id, post.category_id);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[test]
    fn test_patch_can_clear_category() {
        let post = sample_post();
        let updated = PostPatch::new().category(None).apply_to(&post);
        assert_eq!(updated.category_id, None);
    }

    #[test]
    fn test_patch_json_null_clears_but_missing_keeps() {
        let clear: PostPatch = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(clear.category_id, Some(None));

        let keep: PostPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(keep.category_id, None);
        assert!(!keep.is_empty());
    }
}
