//! Port contracts for outbound email.

mod sender;

#[cfg(test)]
pub use sender::MockEmailSender;
pub use sender::{EmailDeliveryError, EmailDeliveryResult, EmailSender};
