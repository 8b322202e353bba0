//! The shared source of truth.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::action::{Action, DecodeError};
use crate::listener::StateListener;
use crate::reducer::reduce;
use crate::state::State;

/// Handle returned by [`Store::subscribe`] and [`Store::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&State) + Send + Sync>;

struct StoreInner {
    state: RwLock<Arc<State>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    /// Serializes dispatch → reduce → notify. Re-entrant so a subscriber may dispatch.
    dispatching: ReentrantMutex<()>,
}

/// Holds the current [`State`] snapshot and broadcasts every transition.
///
/// Cloning is cheap and yields another handle to the same store; pass it
/// to every surface and service that needs it.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    /// Start from a prepared snapshot (tests, restored sessions).
    pub fn with_state(state: State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(state)),
                subscribers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                dispatching: ReentrantMutex::new(()),
            }),
        }
    }

    /// The current snapshot. Read-only; change it through [`Store::dispatch`].
    pub fn get_state(&self) -> Arc<State> {
        Arc::clone(&self.inner.state.read())
    }

    /// Reduce `action` into a new snapshot, install it, then notify every
    /// subscriber in registration order with the store's current snapshot.
    /// Returns the snapshot this dispatch installed.
    pub fn dispatch(&self, action: Action) -> Arc<State> {
        let _serial = self.inner.dispatching.lock();
        let kind = action.kind();

        let next = {
            let mut current = self.inner.state.write();
            let next = Arc::new(reduce(&current, action));
            *current = Arc::clone(&next);
            next
        };

        // Snapshot the list so subscribers can (un)subscribe while being notified.
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        tracing::debug!(action = %kind, subscribers = subscribers.len(), "dispatch");

        for subscriber in &subscribers {
            // An earlier subscriber may have dispatched; always hand out the latest snapshot.
            let current = self.get_state();
            subscriber(&current);
        }
        next
    }

    /// Decode an untrusted `{"type", "payload"}` descriptor and dispatch it.
    pub fn dispatch_json(&self, descriptor: &str) -> Result<Arc<State>, DecodeError> {
        let action = Action::decode(descriptor)?;
        Ok(self.dispatch(action))
    }

    /// Register a callback run after every dispatch.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers.lock().push((id, Arc::new(subscriber)));
        id
    }

    /// Register a listener, filtered by its [`crate::Interest`].
    pub fn connect(&self, listener: Arc<dyn StateListener>) -> SubscriptionId {
        let interest = listener.interests();
        self.subscribe(move |state| {
            if interest.accepts(state.last_action) {
                listener.state_changed(state);
            }
        })
    }

    /// Detach a subscriber. Returns `false` if it was not attached.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.get_state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
