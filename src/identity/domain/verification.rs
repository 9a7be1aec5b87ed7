//! Email verification tokens issued at registration.

use super::UserId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stored verification token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationTokenId(Uuid);

impl VerificationTokenId {
    /// Creates a new random token identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a token identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for VerificationTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VerificationTokenId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque token value delivered to the user by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenValue(String);

impl TokenValue {
    /// Generates a fresh random token value.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps a value received from a verification link.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Single-use email verification token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerificationToken {
    id: VerificationTokenId,
    user_id: UserId,
    value: TokenValue,
    expires_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    /// Issues a new token for `user_id` valid for `ttl`.
    #[must_use]
    pub fn issue(user_id: UserId, ttl: Duration, clock: &impl Clock) -> Self {
        Self {
            id: VerificationTokenId::new(),
            user_id,
            value: TokenValue::generate(),
            expires_at: clock.utc() + ttl,
        }
    }

    /// Reconstructs a token from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: VerificationTokenId,
        user_id: UserId,
        value: TokenValue,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            value,
            expires_at,
        }
    }

    /// Returns the token identifier.
    #[must_use]
    pub const fn id(&self) -> VerificationTokenId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the token value.
    #[must_use]
    pub const fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` when the token expired strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
