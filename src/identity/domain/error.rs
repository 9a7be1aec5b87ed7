//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The phone number does not follow the `+27` national format.
    #[error("phone '{0}' must be in South African format: +27821234567")]
    InvalidPhone(String),

    /// A required name field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

/// Error returned while parsing user roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);
