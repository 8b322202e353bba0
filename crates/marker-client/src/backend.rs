//! The persistence collaborator behind the services.

use async_trait::async_trait;
use marker_domain::{Bookmark, Credentials, Mark, Tag};

use crate::error::Result;

/// Resource-style create/read/update/delete over the three entity types.
///
/// Create and update return the backend's authoritative representation.
/// Lookups that yield nothing return [`crate::ClientError::NotFound`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>>;
    async fn get_bookmark(&self, id: &str) -> Result<Bookmark>;
    async fn find_bookmark_by_url(&self, url: &str) -> Result<Bookmark>;
    async fn create_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark>;
    async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark>;
    async fn delete_bookmark(&self, id: &str) -> Result<()>;

    async fn list_marks(&self) -> Result<Vec<Mark>>;
    async fn get_mark(&self, id: &str) -> Result<Mark>;
    async fn find_marks_by_url(&self, url: &str) -> Result<Vec<Mark>>;
    async fn create_mark(&self, mark: &Mark) -> Result<Mark>;
    async fn update_mark(&self, mark: &Mark) -> Result<Mark>;
    async fn delete_mark(&self, id: &str) -> Result<()>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;
    async fn create_tag(&self, tag: &Tag) -> Result<Tag>;
    async fn update_tag(&self, tag: &Tag) -> Result<Tag>;
    async fn delete_tag(&self, id: &str) -> Result<()>;

    /// Exchange credentials for an opaque token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;
}
