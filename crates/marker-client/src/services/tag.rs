use std::sync::Arc;

use marker_domain::{Tag, ValidationError};
use marker_store::ActionCreators;
use marker_tags::normalize_tag_name;

use super::ServiceContext;
use crate::error::{ClientError, Result};
use crate::intent::{EntityRef, Operation, SyncOutcome};

#[derive(Debug, Clone)]
pub struct TagService {
    context: Arc<ServiceContext>,
}

impl TagService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        let tags = self.context.backend.list_tags().await?;
        self.context.store.init_tags(tags.clone());
        Ok(tags)
    }

    /// Create a tag. A name already in the dictionary (ignoring case) returns
    /// the existing tag without contacting the backend.
    pub async fn create_tag(&self, name: &str) -> Result<SyncOutcome<Tag>> {
        let name = valid_name(name)?;
        let ctx = &self.context;
        if let Some(existing) = ctx.store.get_state().tag_named(&name).cloned() {
            return Ok(SyncOutcome::committed(existing));
        }

        let tag = Tag::new(name);
        let entity = EntityRef::tag(tag.id.clone());
        ctx.begin(&entity, Operation::Create);
        ctx.store.add_tag(tag.clone());

        let outcome = match ctx.backend.create_tag(&tag).await {
            Ok(saved) => {
                if saved.id != tag.id {
                    ctx.store.remove_tag(tag.id.clone());
                }
                ctx.store.add_tag(saved.clone());
                SyncOutcome::new(saved, ctx.committed(&entity, Operation::Create))
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Create, &e, |store| {
                    store.remove_tag(tag.id.clone());
                });
                SyncOutcome::new(tag, status)
            }
        };
        Ok(outcome)
    }

    /// Rename a tag. Bookmarks and marks are re-fetched afterwards since they
    /// embed tag names.
    pub async fn rename_tag(&self, id: &str, new_name: &str) -> Result<SyncOutcome<Tag>> {
        let name = valid_name(new_name)?;
        let ctx = &self.context;
        let state = ctx.store.get_state();
        let previous = state
            .tag(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("tag {id}")))?;
        if state.tag_named(&name).is_some_and(|t| t.id != id) {
            return Err(ClientError::Validation(vec![ValidationError::new(
                "name",
                "A tag with this name already exists",
            )]));
        }
        drop(state);

        let renamed = Tag::with_id(id, name);
        let entity = EntityRef::tag(id);
        ctx.begin(&entity, Operation::Update);
        ctx.store.update_tag(renamed.clone());

        let outcome = match ctx.backend.update_tag(&renamed).await {
            Ok(saved) => {
                ctx.store.update_tag(saved.clone());
                let status = ctx.committed(&entity, Operation::Update);
                ctx.refresh_bookmarks().await;
                ctx.refresh_marks().await;
                SyncOutcome::new(saved, status)
            }
            Err(e) => {
                let status = ctx.failed(&entity, Operation::Update, &e, |store| {
                    store.update_tag(previous);
                });
                SyncOutcome::new(renamed, status)
            }
        };
        Ok(outcome)
    }

    pub async fn delete_tag(&self, id: &str) -> SyncOutcome<Option<Tag>> {
        let ctx = &self.context;
        let entity = EntityRef::tag(id);
        let previous = ctx.store.get_state().tag(id).cloned();
        ctx.begin(&entity, Operation::Delete);
        ctx.store.remove_tag(id);

        let status = match ctx.backend.delete_tag(id).await {
            Ok(()) => {
                let status = ctx.committed(&entity, Operation::Delete);
                ctx.refresh_bookmarks().await;
                ctx.refresh_marks().await;
                status
            }
            Err(e) => ctx.failed(&entity, Operation::Delete, &e, |store| {
                if let Some(previous) = previous.clone() {
                    store.add_tag(previous);
                }
            }),
        };
        SyncOutcome::new(previous, status)
    }

    /// Every known tag name, sorted for autocomplete.
    pub fn all_tag_names(&self) -> Vec<String> {
        self.context.store.get_state().tag_dictionary().names().to_vec()
    }
}

fn valid_name(name: &str) -> Result<String> {
    normalize_tag_name(name).ok_or_else(|| {
        ClientError::Validation(vec![ValidationError::new("name", "Tag name is required")])
    })
}
