//! Authentication token shared between the user service and the transport.

use std::sync::Arc;

use parking_lot::RwLock;

/// Holds the opaque bearer token. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `token` if it is truthy (non-blank). Returns whether it was stored.
    pub fn set(&self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.trim().is_empty() {
            return false;
        }
        *self.token.write() = Some(token);
        true
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_present(&self) -> bool {
        self.token.read().is_some()
    }
}
