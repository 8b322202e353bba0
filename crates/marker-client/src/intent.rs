//! Per-entity record of optimistic mutations and how they settled.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::propagation::PropagationReport;

/// What to do with an optimistic mutation whose remote phase failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the optimistic state in place until the next reconciliation.
    #[default]
    Keep,
    /// Restore the entity as it was before the optimistic dispatch.
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Bookmark,
    Mark,
    Tag,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Bookmark => "bookmark",
            EntityKind::Mark => "mark",
            EntityKind::Tag => "tag",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn bookmark(id: impl Into<String>) -> Self {
        Self { kind: EntityKind::Bookmark, id: id.into() }
    }

    pub fn mark(id: impl Into<String>) -> Self {
        Self { kind: EntityKind::Mark, id: id.into() }
    }

    pub fn tag(id: impl Into<String>) -> Self {
        Self { kind: EntityKind::Tag, id: id.into() }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum IntentStatus {
    Pending,
    Committed,
    /// Remote phase failed; the optimistic state was kept.
    Failed(String),
    /// Remote phase failed; the optimistic state was rolled back.
    Reverted(String),
}

impl IntentStatus {
    pub fn is_committed(&self) -> bool {
        matches!(self, IntentStatus::Committed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, IntentStatus::Failed(_) | IntentStatus::Reverted(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            IntentStatus::Failed(reason) | IntentStatus::Reverted(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub entity: EntityRef,
    pub operation: Operation,
    pub status: IntentStatus,
}

/// Latest intent per entity, in the order entities were first touched.
///
/// Cloning shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct IntentLog {
    records: Arc<Mutex<Vec<IntentRecord>>>,
}

impl IntentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pending intent, replacing any earlier one for the entity.
    pub fn begin(&self, entity: EntityRef, operation: Operation) {
        let record = IntentRecord {
            entity,
            operation,
            status: IntentStatus::Pending,
        };
        let mut records = self.records.lock();
        match records.iter_mut().find(|r| r.entity == record.entity) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Settle the current intent for `entity`. Returns `false` if none was begun.
    pub fn settle(&self, entity: &EntityRef, status: IntentStatus) -> bool {
        match self.records.lock().iter_mut().find(|r| &r.entity == entity) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, entity: &EntityRef) -> Option<IntentRecord> {
        self.records.lock().iter().find(|r| &r.entity == entity).cloned()
    }

    pub fn status(&self, entity: &EntityRef) -> Option<IntentStatus> {
        self.get(entity).map(|r| r.status)
    }

    pub fn records(&self) -> Vec<IntentRecord> {
        self.records.lock().clone()
    }

    pub fn pending(&self) -> Vec<IntentRecord> {
        self.filtered(|s| *s == IntentStatus::Pending)
    }

    /// Intents whose remote phase failed, kept or reverted.
    pub fn failures(&self) -> Vec<IntentRecord> {
        self.filtered(IntentStatus::is_failure)
    }

    fn filtered(&self, keep: impl Fn(&IntentStatus) -> bool) -> Vec<IntentRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| keep(&r.status))
            .cloned()
            .collect()
    }
}

/// Result of a mutating service operation.
///
/// Network failures do not surface as errors; they show up in `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome<T> {
    pub value: T,
    pub status: IntentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation: Option<PropagationReport>,
}

impl<T> SyncOutcome<T> {
    pub fn new(value: T, status: IntentStatus) -> Self {
        Self {
            value,
            status,
            propagation: None,
        }
    }

    pub fn committed(value: T) -> Self {
        Self::new(value, IntentStatus::Committed)
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_committed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_intent_wins_per_entity() {
        let log = IntentLog::new();
        let a = EntityRef::bookmark("a");
        let b = EntityRef::mark("b");

        log.begin(a.clone(), Operation::Create);
        log.begin(b.clone(), Operation::Update);
        log.settle(&a, IntentStatus::Committed);
        log.begin(a.clone(), Operation::Update);

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, a);
        assert_eq!(records[0].operation, Operation::Update);
        assert_eq!(records[0].status, IntentStatus::Pending);
        assert_eq!(log.pending().len(), 2);
    }

    #[test]
    fn failures_include_reverted() {
        let log = IntentLog::new();
        let a = EntityRef::tag("a");
        let b = EntityRef::tag("b");
        log.begin(a.clone(), Operation::Delete);
        log.begin(b.clone(), Operation::Delete);
        log.settle(&a, IntentStatus::Failed("offline".into()));
        log.settle(&b, IntentStatus::Reverted("offline".into()));

        assert_eq!(log.failures().len(), 2);
        assert_eq!(log.status(&a).unwrap().reason(), Some("offline"));
        assert!(!log.settle(&EntityRef::tag("never"), IntentStatus::Committed));
    }

    #[test]
    fn clones_share_the_log() {
        let log = IntentLog::new();
        let other = log.clone();
        other.begin(EntityRef::mark("m"), Operation::Create);
        assert_eq!(log.records().len(), 1);
    }

    #[test]
    fn failure_policy_from_toml_names() {
        let policy: FailurePolicy = serde_json::from_str("\"revert\"").unwrap();
        assert_eq!(policy, FailurePolicy::Revert);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Keep);
    }
}
