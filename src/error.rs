//! Crate-wide error taxonomy.
//!
//! Every service error maps onto one [`ErrorKind`] so that presentation
//! layers can turn failures into user-facing messages without matching on
//! context-specific variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An entity lookup failed.
    NotFound,
    /// The acting user failed an authorization check.
    Unauthorized,
    /// The operation is not valid for the current lifecycle state.
    InvalidState,
    /// The input was malformed or out of range.
    InvalidArgument,
    /// The operation is refused for the acting user regardless of state.
    InvalidOperation,
    /// The operation would duplicate a unique record.
    Conflict,
    /// A persistence collaborator failed.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::InvalidState => "invalid_state",
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidOperation => "invalid_operation",
            Self::Conflict => "conflict",
            Self::Infrastructure => "infrastructure",
        }
    }

    /// Returns `true` when the caller can recover by changing its request.
    #[must_use]
    pub const fn is_caller_recoverable(self) -> bool {
        !matches!(self, Self::Infrastructure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
