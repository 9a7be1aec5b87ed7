//! Delivery port for outbound email.

use crate::mailer::domain::OutgoingEmail;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for email delivery.
pub type EmailDeliveryResult<T> = Result<T, EmailDeliveryError>;

/// Email delivery contract.
///
/// A failed delivery is reported as an error value, never by panicking, so
/// callers can log it and carry on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends a rendered email.
    async fn send(&self, email: &OutgoingEmail) -> EmailDeliveryResult<()>;
}

/// Errors returned by email delivery adapters.
#[derive(Debug, Clone, Error)]
pub enum EmailDeliveryError {
    /// The delivery service refused the message.
    #[error("email rejected with status {status}: {reason}")]
    Rejected {
        /// Status code reported by the delivery service.
        status: u16,
        /// Response text.
        reason: String,
    },

    /// The delivery service could not be reached.
    #[error("email transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmailDeliveryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
