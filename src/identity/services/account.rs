//! Service layer for registration, email verification, and profiles.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{
        EmailAddress, EmailVerificationToken, IdentityDomainError, NewUser, PhoneNumber,
        TokenValue, User,
    },
    ports::{IdentityRepositoryError, UserRepository, VerificationTokenRepository},
};
use crate::mailer::{domain::EmailNotice, ports::EmailSender, services::EmailDispatcher};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Default verification token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Request payload for registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
}

impl RegisterUserRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// How verification tokens are issued and linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Token lifetime.
    pub token_ttl: Duration,
    /// Link prefix; the token value is appended as the `token` query parameter.
    pub link_base: String,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            link_base: "http://localhost:8080/verify".to_owned(),
        }
    }
}

impl VerificationPolicy {
    fn link_for(&self, token: &TokenValue) -> String {
        format!("{}?token={token}", self.link_base.trim_end_matches('/'))
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
    /// The email address is already registered.
    #[error("email is already registered: {0}")]
    EmailAlreadyRegistered(EmailAddress),
    /// No user owns the email address, or the value is not an address.
    #[error("user not found with email: {0}")]
    UserNotFound(String),
    /// The token is unknown or has already been redeemed.
    #[error("invalid or expired verification token")]
    InvalidToken,
    /// The token expired and has been discarded.
    #[error("verification token has expired")]
    TokenExpired,
}

impl AccountError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::InvalidToken => ErrorKind::InvalidArgument,
            Self::Repository(IdentityRepositoryError::DuplicateEmail(_))
            | Self::EmailAlreadyRegistered(_) => ErrorKind::Conflict,
            Self::Repository(IdentityRepositoryError::UserNotFound(_)) | Self::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(IdentityRepositoryError::Persistence(_)) => ErrorKind::Infrastructure,
            Self::TokenExpired => ErrorKind::InvalidState,
        }
    }
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Registration, verification, and profile orchestration service.
#[derive(Clone)]
pub struct AccountService<R, E, C>
where
    R: UserRepository + VerificationTokenRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    email: EmailDispatcher<E>,
    clock: Arc<C>,
    policy: VerificationPolicy,
}

impl<R, E, C> AccountService<R, E, C>
where
    R: UserRepository + VerificationTokenRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    /// Creates a new account service with the default verification policy.
    #[must_use]
    pub fn new(repository: Arc<R>, mailer: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            repository,
            email: EmailDispatcher::new(mailer),
            clock,
            policy: VerificationPolicy::default(),
        }
    }

    /// Replaces the verification policy.
    #[must_use]
    pub fn with_policy(mut self, policy: VerificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers an unverified account and emails a verification link.
    ///
    /// The account and its token are stored together. Email delivery is
    /// best-effort; the account and token persist even when the email cannot
    /// be sent.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailAlreadyRegistered`] when the address is
    /// taken, domain errors for malformed input, or repository errors.
    pub async fn register(&self, request: RegisterUserRequest) -> AccountResult<User> {
        let email = EmailAddress::new(request.email)?;
        if self.repository.exists_by_email(&email).await? {
            return Err(AccountError::EmailAlreadyRegistered(email));
        }

        let mut new_user = NewUser::new(email, request.first_name, request.last_name)?;
        if let Some(phone) = request.phone {
            new_user = new_user.with_phone(PhoneNumber::new(phone)?);
        }

        let user = User::register(new_user, &*self.clock);
        let token = EmailVerificationToken::issue(user.id(), self.policy.token_ttl, &*self.clock);
        self.repository
            .register_with_token(&user, &token)
            .await
            .map_err(|err| match err {
                IdentityRepositoryError::DuplicateEmail(taken) => {
                    AccountError::EmailAlreadyRegistered(taken)
                }
                other => AccountError::Repository(other),
            })?;
        info!(user_id = %user.id(), "account registered; awaiting email verification");

        let notice = EmailNotice::VerifyEmail {
            first_name: user.first_name().to_owned(),
            verification_link: self.policy.link_for(token.value()),
            ttl_hours: self.policy.token_ttl.num_hours(),
        };
        self.email.deliver(user.email(), &notice).await;
        Ok(user)
    }

    /// Redeems a verification token and marks the owner's email verified.
    ///
    /// An expired token is deleted on this attempt. The token is only spent
    /// when the user's verified flag is stored with it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidToken`] for unknown or already redeemed
    /// tokens, [`AccountError::TokenExpired`] for expired tokens, or
    /// repository errors.
    pub async fn verify_email(&self, token_value: &str) -> AccountResult<User> {
        let value = TokenValue::from_raw(token_value);
        let token = self
            .repository
            .find_by_value(&value)
            .await?
            .ok_or(AccountError::InvalidToken)?;

        if token.is_expired_at(self.clock.utc()) {
            self.repository.consume(token.id()).await?;
            return Err(AccountError::TokenExpired);
        }

        let mut user = self
            .repository
            .find_by_id(token.user_id())
            .await?
            .ok_or(IdentityRepositoryError::UserNotFound(token.user_id()))?;
        user.mark_email_verified(&*self.clock);
        if !self.repository.redeem(token.id(), &user).await? {
            return Err(AccountError::InvalidToken);
        }
        info!(user_id = %user.id(), "email verified");
        Ok(user)
    }

    /// Loads a user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when no user owns the address.
    pub async fn read(&self, email: &str) -> AccountResult<User> {
        let missing = || AccountError::UserNotFound(email.to_owned());
        let Ok(address) = EmailAddress::new(email) else {
            return Err(missing());
        };
        self.repository
            .find_by_email(&address)
            .await?
            .ok_or_else(missing)
    }

    /// Replaces a user's biography and phone number.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when no user owns the address,
    /// [`AccountError::Domain`] for a malformed phone number, or repository
    /// errors.
    pub async fn update_profile(
        &self,
        email: &str,
        bio: Option<String>,
        phone: Option<String>,
    ) -> AccountResult<User> {
        let phone_number = phone
            .filter(|value| !value.trim().is_empty())
            .map(PhoneNumber::new)
            .transpose()?;
        let mut user = self.read(email).await?;
        user.update_profile(bio, phone_number, &*self.clock);
        self.repository.update(&user).await?;
        Ok(user)
    }
}
