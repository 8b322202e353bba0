//! One handle bundling the services over a shared context.

use std::sync::Arc;

use marker_store::Store;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpBackend;
use crate::intent::{FailurePolicy, IntentLog};
use crate::services::{BookmarkService, MarkService, ServiceContext, TagService, UserService};
use crate::session::TokenStore;

#[derive(Debug, Clone)]
pub struct MarkerClient {
    pub bookmarks: BookmarkService,
    pub marks: MarkService,
    pub tags: TagService,
    pub users: UserService,
    context: Arc<ServiceContext>,
}

impl MarkerClient {
    pub fn new(store: Store, backend: Arc<dyn Backend>, policy: FailurePolicy) -> Self {
        Self::with_tokens(store, backend, TokenStore::new(), policy)
    }

    pub fn with_tokens(
        store: Store,
        backend: Arc<dyn Backend>,
        tokens: TokenStore,
        policy: FailurePolicy,
    ) -> Self {
        let context = ServiceContext::new(store, backend, tokens, policy);
        Self {
            bookmarks: BookmarkService::new(Arc::clone(&context)),
            marks: MarkService::new(Arc::clone(&context)),
            tags: TagService::new(Arc::clone(&context)),
            users: UserService::new(Arc::clone(&context)),
            context,
        }
    }

    /// Client over the REST backend named in `config`.
    pub fn connect(config: &ClientConfig, store: Store) -> Result<Self> {
        let tokens = TokenStore::new();
        let backend = HttpBackend::new(config, tokens.clone())?;
        tracing::debug!(backend = %backend.base_url(), "using REST backend");
        Ok(Self::with_tokens(
            store,
            Arc::new(backend),
            tokens,
            config.failure_policy,
        ))
    }

    pub fn store(&self) -> &Store {
        &self.context.store
    }

    pub fn intents(&self) -> &IntentLog {
        &self.context.intents
    }

    pub fn context(&self) -> &Arc<ServiceContext> {
        &self.context
    }

    /// Seed the store with every bookmark, mark and tag.
    pub async fn load_all(&self) -> Result<()> {
        self.bookmarks.get_bookmarks().await?;
        self.marks.get_marks().await?;
        self.tags.get_tags().await?;
        Ok(())
    }
}
