//! In-process backend for tests and offline use.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use marker_domain::{validate_credentials, Bookmark, Credentials, Mark, Tag};
use marker_tags::{names_equal, normalize_tag_name};
use parking_lot::Mutex;

use crate::backend::Backend;
use crate::error::{ClientError, Result};

#[derive(Debug, Default)]
struct MemoryData {
    bookmarks: Vec<Bookmark>,
    marks: Vec<Mark>,
    tags: Vec<Tag>,
    offline: bool,
    failing: HashSet<String>,
}

impl MemoryData {
    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(ClientError::Network("backend unreachable".into()));
        }
        Ok(())
    }

    fn check_writable(&self, id: &str) -> Result<()> {
        self.check_online()?;
        if self.failing.contains(id) {
            return Err(ClientError::Network(format!("HTTP 500 writing {id}")));
        }
        Ok(())
    }

    /// Map each tag onto the dictionary entry with the same name, registering
    /// names the dictionary has not seen. Duplicates collapse to the first.
    fn canonicalize(&mut self, tags: &[Tag]) -> Vec<Tag> {
        let mut out: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            let Some(name) = normalize_tag_name(&tag.name) else {
                continue;
            };
            let canonical = match self.tags.iter().find(|t| names_equal(&t.name, &name)) {
                Some(existing) => existing.clone(),
                None => {
                    let id_taken = tag.id.is_empty() || self.tags.iter().any(|t| t.id == tag.id);
                    let registered = if id_taken {
                        Tag::new(name)
                    } else {
                        Tag::with_id(tag.id.clone(), name)
                    };
                    self.tags.push(registered.clone());
                    registered
                }
            };
            if !out.iter().any(|t| t.id == canonical.id) {
                out.push(canonical);
            }
        }
        out
    }
}

/// Authoritative store held in memory.
///
/// Aggregate tags are canonicalised against the tag dictionary on every
/// write, so the dictionary always covers every tag in use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Mutex<MemoryData>,
    requests: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_bookmark(&self, bookmark: Bookmark) {
        let mut data = self.data.lock();
        let mut bookmark = bookmark;
        bookmark.tags = data.canonicalize(&bookmark.tags);
        data.bookmarks.retain(|b| b.id != bookmark.id);
        data.bookmarks.push(bookmark);
    }

    pub fn seed_mark(&self, mark: Mark) {
        let mut data = self.data.lock();
        let mut mark = mark;
        mark.tags = data.canonicalize(&mark.tags);
        data.marks.retain(|m| m.id != mark.id);
        data.marks.push(mark);
    }

    pub fn seed_tag(&self, tag: Tag) {
        let mut data = self.data.lock();
        data.canonicalize(std::slice::from_ref(&tag));
    }

    /// Every request fails with a network error until [`Self::go_online`].
    pub fn go_offline(&self) {
        self.data.lock().offline = true;
    }

    pub fn go_online(&self) {
        self.data.lock().offline = false;
    }

    /// Writes (update/delete) to entity `id` fail until [`Self::clear_failures`].
    pub fn fail_updates_for(&self, id: impl Into<String>) {
        self.data.lock().failing.insert(id.into());
    }

    pub fn clear_failures(&self) {
        self.data.lock().failing.clear();
    }

    /// Number of requests served or refused so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.data.lock().bookmarks.clone()
    }

    pub fn marks(&self) -> Vec<Mark> {
        self.data.lock().marks.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.data.lock().tags.clone()
    }

    fn open(&self) -> parking_lot::MutexGuard<'_, MemoryData> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.data.lock()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let data = self.open();
        data.check_online()?;
        Ok(data.bookmarks.clone())
    }

    async fn get_bookmark(&self, id: &str) -> Result<Bookmark> {
        let data = self.open();
        data.check_online()?;
        data.bookmarks
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("bookmark {id}")))
    }

    async fn find_bookmark_by_url(&self, url: &str) -> Result<Bookmark> {
        let data = self.open();
        data.check_online()?;
        data.bookmarks
            .iter()
            .find(|b| b.url == url)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("bookmark for {url}")))
    }

    async fn create_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark> {
        let mut data = self.open();
        data.check_online()?;
        if data.bookmarks.iter().any(|b| b.id == bookmark.id) {
            return Err(ClientError::Network(format!("HTTP 409 bookmark {}", bookmark.id)));
        }
        let mut saved = bookmark.clone();
        saved.tags = data.canonicalize(&bookmark.tags);
        data.bookmarks.push(saved.clone());
        Ok(saved)
    }

    async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark> {
        let mut data = self.open();
        data.check_writable(&bookmark.id)?;
        let tags = data.canonicalize(&bookmark.tags);
        let slot = data
            .bookmarks
            .iter_mut()
            .find(|b| b.id == bookmark.id)
            .ok_or_else(|| ClientError::NotFound(format!("bookmark {}", bookmark.id)))?;
        *slot = Bookmark {
            tags,
            ..bookmark.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_bookmark(&self, id: &str) -> Result<()> {
        let mut data = self.open();
        data.check_writable(id)?;
        data.bookmarks.retain(|b| b.id != id);
        Ok(())
    }

    async fn list_marks(&self) -> Result<Vec<Mark>> {
        let data = self.open();
        data.check_online()?;
        Ok(data.marks.clone())
    }

    async fn get_mark(&self, id: &str) -> Result<Mark> {
        let data = self.open();
        data.check_online()?;
        data.marks
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("mark {id}")))
    }

    async fn find_marks_by_url(&self, url: &str) -> Result<Vec<Mark>> {
        let data = self.open();
        data.check_online()?;
        Ok(data.marks.iter().filter(|m| m.url == url).cloned().collect())
    }

    async fn create_mark(&self, mark: &Mark) -> Result<Mark> {
        let mut data = self.open();
        data.check_online()?;
        if data.marks.iter().any(|m| m.id == mark.id) {
            return Err(ClientError::Network(format!("HTTP 409 mark {}", mark.id)));
        }
        let mut saved = mark.clone();
        saved.tags = data.canonicalize(&mark.tags);
        data.marks.push(saved.clone());
        Ok(saved)
    }

    async fn update_mark(&self, mark: &Mark) -> Result<Mark> {
        let mut data = self.open();
        data.check_writable(&mark.id)?;
        let tags = data.canonicalize(&mark.tags);
        let slot = data
            .marks
            .iter_mut()
            .find(|m| m.id == mark.id)
            .ok_or_else(|| ClientError::NotFound(format!("mark {}", mark.id)))?;
        *slot = Mark {
            tags,
            ..mark.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_mark(&self, id: &str) -> Result<()> {
        let mut data = self.open();
        data.check_writable(id)?;
        data.marks.retain(|m| m.id != id);
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let data = self.open();
        data.check_online()?;
        Ok(data.tags.clone())
    }

    async fn create_tag(&self, tag: &Tag) -> Result<Tag> {
        let mut data = self.open();
        data.check_online()?;
        data.canonicalize(std::slice::from_ref(tag))
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Network("HTTP 400 blank tag name".into()))
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag> {
        let mut data = self.open();
        data.check_writable(&tag.id)?;
        let name = normalize_tag_name(&tag.name)
            .ok_or_else(|| ClientError::Network("HTTP 400 blank tag name".into()))?;
        if data
            .tags
            .iter()
            .any(|t| t.id != tag.id && names_equal(&t.name, &name))
        {
            return Err(ClientError::Network(format!("HTTP 409 tag {name}")));
        }
        let renamed = Tag::with_id(tag.id.clone(), name);
        let slot = data
            .tags
            .iter_mut()
            .find(|t| t.id == tag.id)
            .ok_or_else(|| ClientError::NotFound(format!("tag {}", tag.id)))?;
        *slot = renamed.clone();

        for bookmark in data.bookmarks.iter_mut() {
            rename_in(&mut bookmark.tags, &renamed);
        }
        for mark in data.marks.iter_mut() {
            rename_in(&mut mark.tags, &renamed);
        }
        Ok(renamed)
    }

    async fn delete_tag(&self, id: &str) -> Result<()> {
        let mut data = self.open();
        data.check_writable(id)?;
        data.tags.retain(|t| t.id != id);
        for bookmark in data.bookmarks.iter_mut() {
            bookmark.tags.retain(|t| t.id != id);
        }
        for mark in data.marks.iter_mut() {
            mark.tags.retain(|t| t.id != id);
        }
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let data = self.open();
        data.check_online()?;
        let errors = validate_credentials(credentials);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }
        Ok(format!("memory-{}", uuid::Uuid::new_v4()))
    }
}

fn rename_in(tags: &mut [Tag], renamed: &Tag) {
    for tag in tags.iter_mut().filter(|t| t.id == renamed.id) {
        tag.name = renamed.name.clone();
    }
}
