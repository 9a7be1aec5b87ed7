//! Domain model for user identity.
//!
//! Users are owned by the identity store. The marketplace only reads them,
//! and identity services mutate nothing but profile fields and the
//! verification flag.

mod error;
mod ids;
mod user;
mod verification;

pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::{EmailAddress, PhoneNumber, UserId};
pub use user::{NewUser, PersistedUserData, Role, User};
pub use verification::{EmailVerificationToken, TokenValue, VerificationTokenId};
