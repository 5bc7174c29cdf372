//! Driven port for exchanging credentials for a session token.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{LoginCredentials, SessionToken};

/// Port for signing in against the wallet API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Authenticate and return the issued session token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, ApiError>;
}
