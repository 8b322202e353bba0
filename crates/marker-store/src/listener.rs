//! The contract UI surfaces implement to follow the store.

use crate::action::ActionKind;
use crate::state::State;

/// Which dispatches a listener wants to hear about, judged by `last_action`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interest {
    #[default]
    All,
    Only(Vec<ActionKind>),
}

impl Interest {
    pub fn only(kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        Interest::Only(kinds.into_iter().collect())
    }

    pub fn accepts(&self, kind: Option<ActionKind>) -> bool {
        match (self, kind) {
            (Interest::All, _) => true,
            (Interest::Only(kinds), Some(kind)) => kinds.contains(&kind),
            (Interest::Only(_), None) => false,
        }
    }
}

/// A surface that re-renders from store snapshots.
///
/// `state_changed` runs synchronously inside `dispatch`, after the new
/// snapshot is in place. Listeners stay attached until they call
/// [`crate::Store::unsubscribe`] with the id returned by
/// [`crate::Store::connect`].
pub trait StateListener: Send + Sync {
    /// Read once, when the listener is connected.
    fn interests(&self) -> Interest {
        Interest::All
    }

    fn state_changed(&self, state: &State);
}
