use std::sync::Arc;

use marker_domain::{validate_credentials, Credentials};
use marker_store::ActionCreators;

use super::ServiceContext;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct UserService {
    context: Arc<ServiceContext>,
}

impl UserService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    /// Sign in. Malformed credentials are rejected before anything is sent.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let errors = validate_credentials(credentials);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        let token = self.context.backend.login(credentials).await?;
        if !self.context.tokens.set(token) {
            return Err(ClientError::Decode("empty token".into()));
        }
        tracing::info!(email = %credentials.email, "signed in");
        self.context.store.signed_in();
        Ok(())
    }

    pub fn logout(&self) {
        self.context.tokens.clear();
        self.context.store.signed_out();
        tracing::info!("signed out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.context.tokens.is_present()
    }
}
