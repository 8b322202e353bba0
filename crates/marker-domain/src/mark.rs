//! Mark (highlighted passage) domain model

use super::{PageContext, Tag};
use serde::{Deserialize, Serialize};

/// A highlighted text passage on a page
///
/// Identity is `id`; `url` is the grouping key shared with [`crate::Bookmark`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub created_at: i64,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Mark {
    /// Build a mark for a passage of the given page.
    pub fn new_for_page(page: &PageContext, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: page.url.clone(),
            origin: page.origin(),
            title: page.bookmark_title(),
            text: text.into(),
            created_at: crate::now_millis(),
            tags: Vec::new(),
        }
    }

    /// Builder method to replace the tag list
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }
}
