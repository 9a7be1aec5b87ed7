//! Port contracts for the identity store.

pub mod repository;

pub use repository::{
    IdentityRepositoryError, IdentityRepositoryResult, UserRepository,
    VerificationTokenRepository,
};
