//! User aggregate root.

use super::{EmailAddress, IdentityDomainError, ParseRoleError, PhoneNumber, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular marketplace participant.
    User,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Validated input for a newly registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: EmailAddress,
    first_name: String,
    last_name: String,
    phone: Option<PhoneNumber>,
}

impl NewUser {
    /// Creates registration input.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyName`] when either name is blank.
    pub fn new(
        email: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, IdentityDomainError> {
        Ok(Self {
            email,
            first_name: required_name(first_name.into(), "first name")?,
            last_name: required_name(last_name.into(), "last name")?,
            phone: None,
        })
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: PhoneNumber) -> Self {
        self.phone = Some(phone);
        self
    }
}

fn required_name(value: String, field: &'static str) -> Result<String, IdentityDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityDomainError::EmptyName(field));
    }
    Ok(trimmed.to_owned())
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: Role,
    bio: Option<String>,
    phone: Option<PhoneNumber>,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted first name.
    pub first_name: String,
    /// Persisted last name.
    pub last_name: String,
    /// Persisted role.
    pub role: Role,
    /// Persisted profile biography.
    pub bio: Option<String>,
    /// Persisted phone number.
    pub phone: Option<PhoneNumber>,
    /// Persisted verification flag.
    pub email_verified: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Registers a new, unverified regular user.
    #[must_use]
    pub fn register(new_user: NewUser, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: Role::User,
            bio: None,
            phone: new_user.phone,
            email_verified: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role,
            bio: data.bio,
            phone: data.phone,
            email_verified: data.email_verified,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the account email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns `"first last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the profile biography, if any.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Returns the contact phone number, if any.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Returns `true` once a verification token has been redeemed.
    ///
    /// Consumed by the authentication collaborator to gate login.
    #[must_use]
    pub const fn is_email_verified(&self) -> bool {
        self.email_verified
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the email address as verified.
    pub fn mark_email_verified(&mut self, clock: &impl Clock) {
        self.email_verified = true;
        self.updated_at = clock.utc();
    }

    /// Replaces the editable profile fields.
    ///
    /// A blank biography clears it.
    pub fn update_profile(
        &mut self,
        bio: Option<String>,
        phone: Option<PhoneNumber>,
        clock: &impl Clock,
    ) {
        self.bio = bio
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        self.phone = phone;
        self.updated_at = clock.utc();
    }
}
