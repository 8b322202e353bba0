//! Bookmark domain model

use super::{PageContext, Tag};
use serde::{Deserialize, Serialize};

/// A saved page
///
/// Identity is `id`; `url` is the grouping key shared with [`crate::Mark`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub title: String,
    pub created_at: i64,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Bookmark {
    /// Build a bookmark for the given page with a fresh id and creation time.
    ///
    /// Nothing is stored or sent; pass the result to the bookmark service.
    pub fn new_for_page(page: &PageContext, is_starred: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: page.url.clone(),
            origin: page.origin(),
            title: page.bookmark_title(),
            created_at: crate::now_millis(),
            is_starred,
            tags: Vec::new(),
        }
    }

    /// Builder method to replace the tag list
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_for_page() {
        let page = PageContext::new("https://example.com/post", "Post");
        let bookmark = Bookmark::new_for_page(&page, true);
        assert_eq!(bookmark.url, "https://example.com/post");
        assert_eq!(bookmark.origin, "https://example.com");
        assert_eq!(bookmark.title, "Post");
        assert!(bookmark.is_starred);
        assert!(bookmark.tags.is_empty());
        assert!(bookmark.created_at > 0);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let bookmark = Bookmark::new_for_page(&PageContext::new("https://x", "X"), false)
            .with_tags(vec![Tag::with_id("t1", "a")]);
        let json = serde_json::to_value(&bookmark).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["isStarred"], serde_json::json!(false));
        assert_eq!(json["tags"][0]["name"], serde_json::json!("a"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id":"b1","url":"https://x","createdAt":1}"#;
        let bookmark: Bookmark = serde_json::from_str(json).unwrap();
        assert!(!bookmark.is_starred);
        assert!(bookmark.tags.is_empty());
        assert_eq!(bookmark.title, "");
    }
}
