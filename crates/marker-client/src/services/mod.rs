//! Persistence services: optimistic dispatch, remote call, reconciliation.

mod bookmark;
mod mark;
mod tag;
mod user;

pub use bookmark::BookmarkService;
pub use mark::MarkService;
pub use tag::TagService;
pub use user::UserService;

use std::sync::Arc;

use marker_domain::Tag;
use marker_store::{ActionCreators, State, Store};
use marker_tags::{dedupe_names, names_equal};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::intent::{EntityRef, FailurePolicy, IntentLog, IntentStatus, Operation};
use crate::session::TokenStore;

/// Everything the services share. Build once and hand an `Arc` to each service.
pub struct ServiceContext {
    pub store: Store,
    pub backend: Arc<dyn Backend>,
    pub intents: IntentLog,
    pub tokens: TokenStore,
    pub policy: FailurePolicy,
}

impl ServiceContext {
    pub fn new(
        store: Store,
        backend: Arc<dyn Backend>,
        tokens: TokenStore,
        policy: FailurePolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            backend,
            intents: IntentLog::new(),
            tokens,
            policy,
        })
    }

    pub(crate) fn begin(&self, entity: &EntityRef, operation: Operation) {
        self.intents.begin(entity.clone(), operation);
    }

    pub(crate) fn committed(&self, entity: &EntityRef, operation: Operation) -> IntentStatus {
        tracing::info!(entity = %entity, ?operation, "remote write committed");
        self.intents.settle(entity, IntentStatus::Committed);
        IntentStatus::Committed
    }

    /// Record a failed remote phase. Under [`FailurePolicy::Revert`] `revert`
    /// runs first to restore the pre-optimistic state.
    pub(crate) fn failed(
        &self,
        entity: &EntityRef,
        operation: Operation,
        error: &ClientError,
        revert: impl FnOnce(&Store),
    ) -> IntentStatus {
        let reason = error.to_string();
        let status = match self.policy {
            FailurePolicy::Keep => IntentStatus::Failed(reason),
            FailurePolicy::Revert => {
                revert(&self.store);
                IntentStatus::Reverted(reason)
            }
        };
        tracing::warn!(entity = %entity, ?operation, error = %error, ?status, "remote write failed");
        self.intents.settle(entity, status.clone());
        status
    }

    /// Replace the bookmark collection with the backend's.
    pub(crate) async fn refresh_bookmarks(&self) {
        match self.backend.list_bookmarks().await {
            Ok(bookmarks) => {
                self.store.init_bookmarks(bookmarks);
            }
            Err(e) => tracing::warn!(error = %e, "bookmark reconciliation failed"),
        }
    }

    pub(crate) async fn refresh_marks(&self) {
        match self.backend.list_marks().await {
            Ok(marks) => {
                self.store.init_marks(marks);
            }
            Err(e) => tracing::warn!(error = %e, "mark reconciliation failed"),
        }
    }

    pub(crate) async fn refresh_tags(&self) {
        match self.backend.list_tags().await {
            Ok(tags) => {
                self.store.init_tags(tags);
            }
            Err(e) => tracing::warn!(error = %e, "tag reconciliation failed"),
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("policy", &self.policy)
            .field("signed_in", &self.tokens.is_present())
            .finish_non_exhaustive()
    }
}

/// Turn chip names into tags, reusing dictionary entries where the name is known.
pub(crate) fn resolve_chips(state: &State, chips: &[String]) -> Vec<Tag> {
    dedupe_names(chips)
        .into_iter()
        .map(|name| {
            state
                .tags
                .iter()
                .find(|t| names_equal(&t.name, &name))
                .cloned()
                .unwrap_or_else(|| Tag::new(name))
        })
        .collect()
}
