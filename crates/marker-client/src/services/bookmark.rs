use std::sync::Arc;

use marker_domain::{Bookmark, PageContext};
use marker_store::ActionCreators;
use marker_tags::{same_tag_names, TagsChanged};

use super::{resolve_chips, ServiceContext};
use crate::error::{ClientError, Result};
use crate::intent::{EntityRef, Operation, SyncOutcome};
use crate::propagation::{propagate, PropagationSource};

#[derive(Debug, Clone)]
pub struct BookmarkService {
    context: Arc<ServiceContext>,
}

impl BookmarkService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    /// Fetch every bookmark and seed the store with them.
    pub async fn get_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let bookmarks = self.context.backend.list_bookmarks().await?;
        self.context.store.init_bookmarks(bookmarks.clone());
        Ok(bookmarks)
    }

    pub async fn get_bookmark_by_id(&self, id: &str) -> Result<Bookmark> {
        self.context.backend.get_bookmark(id).await
    }

    pub async fn get_bookmark_for_url(&self, url: &str) -> Result<Bookmark> {
        self.context.backend.find_bookmark_by_url(url).await
    }

    /// A fresh, untagged bookmark for `page`. Nothing is dispatched or sent.
    pub fn create_new_bookmark(&self, page: &PageContext, is_starred: bool) -> Bookmark {
        Bookmark::new_for_page(page, is_starred)
    }

    pub async fn create_bookmark(&self, bookmark: Bookmark) -> SyncOutcome<Bookmark> {
        let ctx = &self.context;
        let entity = EntityRef::bookmark(bookmark.id.clone());
        ctx.begin(&entity, Operation::Create);
        ctx.store.add_bookmark(bookmark.clone());

        match ctx.backend.create_bookmark(&bookmark).await {
            Ok(saved) => {
                if saved.id != bookmark.id {
                    ctx.store.remove_bookmark(bookmark.id.clone());
                }
                // Upsert: a refresh may have replaced the collection since the optimistic add.
                ctx.store.add_bookmark(saved.clone());
                let status = ctx.committed(&entity, Operation::Create);
                // The backend may have registered new tag names.
                ctx.refresh_tags().await;
                SyncOutcome::new(saved, status)
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Create, &e, |store| {
                    store.remove_bookmark(bookmark.id.clone());
                });
                SyncOutcome::new(bookmark, status)
            }
        }
    }

    /// Update a bookmark. When its tag count differs from the one in the store,
    /// the new tags are propagated to marks on the same page before the
    /// bookmark and tag collections are re-fetched.
    pub async fn update_bookmark(&self, bookmark: Bookmark) -> SyncOutcome<Bookmark> {
        let previous_count = self
            .context
            .store
            .get_state()
            .bookmark(&bookmark.id)
            .map_or(0, |b| b.tags.len());
        let tags_changed = previous_count != bookmark.tags.len();

        let mut outcome = self.push_update(bookmark).await;
        if outcome.is_committed() && tags_changed {
            let source = PropagationSource::Bookmark(outcome.value.clone());
            outcome.propagation = Some(propagate(&self.context, &source).await);
        }
        if outcome.is_committed() {
            self.reconcile().await;
        }
        outcome
    }

    /// Full update cycle without propagation; used for propagation targets.
    pub async fn update_bookmark_only(&self, bookmark: Bookmark) -> SyncOutcome<Bookmark> {
        let outcome = self.push_update(bookmark).await;
        if outcome.is_committed() {
            self.reconcile().await;
        }
        outcome
    }

    pub async fn delete_bookmark(&self, id: &str) -> SyncOutcome<Option<Bookmark>> {
        let ctx = &self.context;
        let entity = EntityRef::bookmark(id);
        let previous = ctx.store.get_state().bookmark(id).cloned();
        ctx.begin(&entity, Operation::Delete);
        ctx.store.remove_bookmark(id);

        let status = match ctx.backend.delete_bookmark(id).await {
            Ok(()) => ctx.committed(&entity, Operation::Delete),
            Err(e) => ctx.failed(&entity, Operation::Delete, &e, |store| {
                if let Some(previous) = previous.clone() {
                    store.add_bookmark(previous);
                }
            }),
        };
        SyncOutcome::new(previous, status)
    }

    /// Flip `is_starred` on a bookmark held in the store.
    pub async fn toggle_star(&self, id: &str) -> Result<SyncOutcome<Bookmark>> {
        let mut bookmark = self.stored(id)?;
        bookmark.is_starred = !bookmark.is_starred;
        Ok(self.update_bookmark(bookmark).await)
    }

    /// Apply a chip editor's `tagsChanged` event to a bookmark held in the store.
    /// Unchanged tag names are a no-op.
    pub async fn apply_chips(&self, id: &str, event: &TagsChanged) -> Result<SyncOutcome<Bookmark>> {
        let mut bookmark = self.stored(id)?;
        let tags = resolve_chips(&self.context.store.get_state(), &event.chips);
        if same_tag_names(&bookmark.tags, &tags) {
            return Ok(SyncOutcome::committed(bookmark));
        }
        bookmark.tags = tags;
        Ok(self.update_bookmark(bookmark).await)
    }

    fn stored(&self, id: &str) -> Result<Bookmark> {
        self.context
            .store
            .get_state()
            .bookmark(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("bookmark {id}")))
    }

    async fn push_update(&self, bookmark: Bookmark) -> SyncOutcome<Bookmark> {
        let ctx = &self.context;
        let entity = EntityRef::bookmark(bookmark.id.clone());
        let previous = ctx.store.get_state().bookmark(&bookmark.id).cloned();
        ctx.begin(&entity, Operation::Update);
        ctx.store.update_bookmark(bookmark.clone());

        match ctx.backend.update_bookmark(&bookmark).await {
            Ok(saved) => {
                ctx.store.update_bookmark(saved.clone());
                SyncOutcome::new(saved, ctx.committed(&entity, Operation::Update))
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Update, &e, |store| {
                    if let Some(previous) = previous {
                        store.update_bookmark(previous);
                    }
                });
                SyncOutcome::new(bookmark, status)
            }
        }
    }

    async fn reconcile(&self) {
        self.context.refresh_bookmarks().await;
        self.context.refresh_tags().await;
    }
}
