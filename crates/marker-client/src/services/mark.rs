use std::sync::Arc;

use marker_domain::{Mark, PageContext};
use marker_store::ActionCreators;
use marker_tags::{same_tag_names, TagsChanged};

use super::{resolve_chips, ServiceContext};
use crate::error::{ClientError, Result};
use crate::intent::{EntityRef, Operation, SyncOutcome};
use crate::propagation::{propagate, PropagationSource};

#[derive(Debug, Clone)]
pub struct MarkService {
    context: Arc<ServiceContext>,
}

impl MarkService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    pub async fn get_marks(&self) -> Result<Vec<Mark>> {
        let marks = self.context.backend.list_marks().await?;
        self.context.store.init_marks(marks.clone());
        Ok(marks)
    }

    pub async fn get_mark_by_id(&self, id: &str) -> Result<Mark> {
        self.context.backend.get_mark(id).await
    }

    pub async fn get_marks_for_url(&self, url: &str) -> Result<Vec<Mark>> {
        self.context.backend.find_marks_by_url(url).await
    }

    pub fn create_new_mark(&self, page: &PageContext, text: impl Into<String>) -> Mark {
        Mark::new_for_page(page, text)
    }

    pub async fn create_mark(&self, mark: Mark) -> SyncOutcome<Mark> {
        let ctx = &self.context;
        let entity = EntityRef::mark(mark.id.clone());
        ctx.begin(&entity, Operation::Create);
        ctx.store.add_mark(mark.clone());

        match ctx.backend.create_mark(&mark).await {
            Ok(saved) => {
                if saved.id != mark.id {
                    ctx.store.remove_mark(mark.id.clone());
                }
                // Upsert: a refresh may have replaced the collection since the optimistic add.
                ctx.store.add_mark(saved.clone());
                let status = ctx.committed(&entity, Operation::Create);
                ctx.refresh_tags().await;
                SyncOutcome::new(saved, status)
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Create, &e, |store| {
                    store.remove_mark(mark.id.clone());
                });
                SyncOutcome::new(mark, status)
            }
        }
    }

    /// Update a mark, propagating its tags to bookmarks on the same page when
    /// the tag count changed.
    pub async fn update_mark(&self, mark: Mark) -> SyncOutcome<Mark> {
        let previous_count = self
            .context
            .store
            .get_state()
            .mark(&mark.id)
            .map_or(0, |m| m.tags.len());
        let tags_changed = previous_count != mark.tags.len();

        let mut outcome = self.push_update(mark).await;
        if outcome.is_committed() && tags_changed {
            let source = PropagationSource::Mark(outcome.value.clone());
            outcome.propagation = Some(propagate(&self.context, &source).await);
        }
        if outcome.is_committed() {
            self.reconcile().await;
        }
        outcome
    }

    /// Full update cycle without propagation.
    pub async fn update_mark_only(&self, mark: Mark) -> SyncOutcome<Mark> {
        let outcome = self.push_update(mark).await;
        if outcome.is_committed() {
            self.reconcile().await;
        }
        outcome
    }

    pub async fn delete_mark(&self, id: &str) -> SyncOutcome<Option<Mark>> {
        let ctx = &self.context;
        let entity = EntityRef::mark(id);
        let previous = ctx.store.get_state().mark(id).cloned();
        ctx.begin(&entity, Operation::Delete);
        ctx.store.remove_mark(id);

        let status = match ctx.backend.delete_mark(id).await {
            Ok(()) => ctx.committed(&entity, Operation::Delete),
            Err(e) => ctx.failed(&entity, Operation::Delete, &e, |store| {
                if let Some(previous) = previous.clone() {
                    store.add_mark(previous);
                }
            }),
        };
        SyncOutcome::new(previous, status)
    }

    pub async fn apply_chips(&self, id: &str, event: &TagsChanged) -> Result<SyncOutcome<Mark>> {
        let mut mark = self
            .context
            .store
            .get_state()
            .mark(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("mark {id}")))?;
        let tags = resolve_chips(&self.context.store.get_state(), &event.chips);
        if same_tag_names(&mark.tags, &tags) {
            return Ok(SyncOutcome::committed(mark));
        }
        mark.tags = tags;
        Ok(self.update_mark(mark).await)
    }

    async fn push_update(&self, mark: Mark) -> SyncOutcome<Mark> {
        let ctx = &self.context;
        let entity = EntityRef::mark(mark.id.clone());
        let previous = ctx.store.get_state().mark(&mark.id).cloned();
        ctx.begin(&entity, Operation::Update);
        ctx.store.update_mark(mark.clone());

        match ctx.backend.update_mark(&mark).await {
            Ok(saved) => {
                ctx.store.update_mark(saved.clone());
                SyncOutcome::new(saved, ctx.committed(&entity, Operation::Update))
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Update, &e, |store| {
                    if let Some(previous) = previous {
                        store.update_mark(previous);
                    }
                });
                SyncOutcome::new(mark, status)
            }
        }
    }

    async fn reconcile(&self) {
        self.context.refresh_marks().await;
        self.context.refresh_tags().await;
    }
}
