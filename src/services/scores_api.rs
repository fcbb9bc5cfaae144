//! Trait and types for the camp scoring backend.

use async_trait::async_trait;

use crate::auth::Credentials;
use crate::error::ApiError;
use crate::scores::ScoreRecord;

/// What a successful login hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub username: String,
    /// The shift the user is assigned to, when the backend reports one.
    pub shift: Option<u32>,
}

/// Abstraction over the camp backend that issues tokens and serves tent scores.
#[async_trait]
pub trait ScoresApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError>;

    /// Returns every tent score recorded during `shift`, in server order.
    async fn shift_scores(&self, token: &str, shift: u32) -> Result<Vec<ScoreRecord>, ApiError>;
}
