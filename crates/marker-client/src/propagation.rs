//! Tag propagation across aggregates sharing a URL.
//!
//! When a bookmark's tags change, every mark on the same page receives the
//! same tags, and vice versa. Each target runs its own update cycle; the
//! steps are independent, so some may commit while others fail. The
//! returned [`PropagationReport`] says which.

use std::sync::Arc;

use futures::future::join_all;
use marker_domain::{Bookmark, Mark, Tag};
use serde::Serialize;

use crate::intent::{EntityKind, EntityRef, IntentStatus};
use crate::services::{BookmarkService, MarkService, ServiceContext};

/// The aggregate whose tag edit is being propagated.
#[derive(Debug, Clone)]
pub enum PropagationSource {
    Bookmark(Bookmark),
    Mark(Mark),
}

impl PropagationSource {
    pub fn url(&self) -> &str {
        match self {
            PropagationSource::Bookmark(b) => &b.url,
            PropagationSource::Mark(m) => &m.url,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        match self {
            PropagationSource::Bookmark(b) => &b.tags,
            PropagationSource::Mark(m) => &m.tags,
        }
    }

    /// Kind of the aggregates that receive the tags.
    pub fn target_kind(&self) -> EntityKind {
        match self {
            PropagationSource::Bookmark(_) => EntityKind::Mark,
            PropagationSource::Mark(_) => EntityKind::Bookmark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationFailure {
    pub target: EntityRef,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub url: String,
    pub succeeded: Vec<EntityRef>,
    pub failed: Vec<PropagationFailure>,
}

impl PropagationReport {
    fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn target_count(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every target committed (including when there were none).
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, target: EntityRef, status: IntentStatus) {
        match status.reason() {
            Some(reason) => self.failed.push(PropagationFailure {
                target,
                reason: reason.to_string(),
            }),
            None => self.succeeded.push(target),
        }
    }
}

/// Copy the source's tags onto every aggregate of the other kind that shares
/// its URL in the current snapshot, running each target's update concurrently.
pub async fn propagate(context: &Arc<ServiceContext>, source: &PropagationSource) -> PropagationReport {
    let url = source.url();
    let tags = source.tags().to_vec();
    let state = context.store.get_state();
    let mut report = PropagationReport::empty(url);

    match source {
        PropagationSource::Bookmark(_) => {
            let service = MarkService::new(Arc::clone(context));
            let targets: Vec<Mark> = state
                .marks_for_url(url)
                .map(|m| m.clone().with_tags(tags.clone()))
                .collect();
            let updates = targets.into_iter().map(|mark| {
                let service = service.clone();
                async move {
                    let target = EntityRef::mark(mark.id.clone());
                    (target, service.update_mark_only(mark).await.status)
                }
            });
            for (target, status) in join_all(updates).await {
                report.record(target, status);
            }
        }
        PropagationSource::Mark(_) => {
            let service = BookmarkService::new(Arc::clone(context));
            let targets: Vec<Bookmark> = state
                .bookmarks_for_url(url)
                .map(|b| b.clone().with_tags(tags.clone()))
                .collect();
            let updates = targets.into_iter().map(|bookmark| {
                let service = service.clone();
                async move {
                    let target = EntityRef::bookmark(bookmark.id.clone());
                    (target, service.update_bookmark_only(bookmark).await.status)
                }
            });
            for (target, status) in join_all(updates).await {
                report.record(target, status);
            }
        }
    }

    if report.is_complete() {
        tracing::info!(url, targets = report.target_count(), kind = %source.target_kind(), "tags propagated");
    } else {
        tracing::warn!(
            url,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "tag propagation incomplete"
        );
    }
    report
}
