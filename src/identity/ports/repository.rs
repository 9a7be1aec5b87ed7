//! Repository ports for user accounts and verification tokens.

use crate::identity::domain::{
    EmailAddress, EmailVerificationToken, TokenValue, User, UserId, VerificationTokenId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity repository operations.
pub type IdentityRepositoryResult<T> = Result<T, IdentityRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a newly registered user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateEmail`] when another user
    /// already owns the email address.
    async fn store(&self, user: &User) -> IdentityRepositoryResult<()>;

    /// Persists profile and verification changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn update(&self, user: &User) -> IdentityRepositoryResult<()>;

    /// Finds a user by exact (case-sensitive) email address.
    async fn find_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<Option<User>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> IdentityRepositoryResult<Option<User>>;

    /// Returns `true` when a user owns the email address.
    async fn exists_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<bool>;
}

/// Verification token persistence contract.
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Stores a newly registered user together with their first token.
    ///
    /// Either both rows are written or neither is.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateEmail`] when another user
    /// already owns the email address.
    async fn register_with_token(
        &self,
        user: &User,
        token: &EmailVerificationToken,
    ) -> IdentityRepositoryResult<()>;

    /// Finds a token by its delivered value.
    async fn find_by_value(
        &self,
        value: &TokenValue,
    ) -> IdentityRepositoryResult<Option<EmailVerificationToken>>;

    /// Deletes a token, returning `true` only for the caller that removed it.
    ///
    /// Concurrent redemptions of the same token observe exactly one `true`.
    async fn consume(&self, id: VerificationTokenId) -> IdentityRepositoryResult<bool>;

    /// Deletes a token and persists its owner's changes in one step.
    ///
    /// Returns `false` without touching the user when the token is already
    /// gone. A failed user write keeps the token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::UserNotFound`] when the owner does
    /// not exist.
    async fn redeem(&self, id: VerificationTokenId, owner: &User)
    -> IdentityRepositoryResult<bool>;
}

/// Errors returned by identity repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityRepositoryError {
    /// Another user already owns the email address.
    #[error("email already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
