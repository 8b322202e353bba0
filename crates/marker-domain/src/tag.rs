//! Tag representation for labelling bookmarks and marks

use serde::{Deserialize, Serialize};

/// A tag attached to bookmarks and marks
///
/// Identity is the `id`; `name` is the user-visible label and is compared
/// case-insensitively wherever duplicates matter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Tag {
    /// Create a new tag with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Create a tag with a known id (e.g. one issued by the backend)
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Names of a tag list, in order.
pub fn tag_names(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|t| t.name.clone()).collect()
}
