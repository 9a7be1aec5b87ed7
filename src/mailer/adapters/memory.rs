//! Recording mailer for tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::identity::domain::EmailAddress;
use crate::mailer::{
    domain::OutgoingEmail,
    ports::{EmailDeliveryError, EmailDeliveryResult, EmailSender},
};

/// Thread-safe mailer that records delivered emails.
///
/// Can be told to fail for every recipient or for selected recipients.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    state: Arc<RwLock<MailboxState>>,
}

#[derive(Debug, Default)]
struct MailboxState {
    delivered: Vec<OutgoingEmail>,
    fail_all: bool,
    failing_recipients: HashSet<EmailAddress>,
    attempts: usize,
}

impl InMemoryMailer {
    /// Creates a mailer that accepts every email.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mailer that rejects every email.
    #[must_use]
    pub fn failing() -> Self {
        let mailer = Self::new();
        if let Ok(mut state) = mailer.state.write() {
            state.fail_all = true;
        }
        mailer
    }

    /// Rejects future emails addressed to `recipient`.
    pub fn fail_for(&self, recipient: EmailAddress) {
        if let Ok(mut state) = self.state.write() {
            state.failing_recipients.insert(recipient);
        }
    }

    /// Returns the emails delivered so far, in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<OutgoingEmail> {
        self.state
            .read()
            .map(|state| state.delivered.clone())
            .unwrap_or_default()
    }

    /// Returns the emails delivered to `recipient`.
    #[must_use]
    pub fn delivered_to(&self, recipient: &EmailAddress) -> Vec<OutgoingEmail> {
        self.delivered()
            .into_iter()
            .filter(|email| email.to() == recipient)
            .collect()
    }

    /// Returns the number of send attempts, successful or not.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.state.read().map(|state| state.attempts).unwrap_or(0)
    }
}

#[async_trait]
impl EmailSender for InMemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> EmailDeliveryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| EmailDeliveryError::transport(std::io::Error::other(err.to_string())))?;
        state.attempts += 1;
        if state.fail_all || state.failing_recipients.contains(email.to()) {
            return Err(EmailDeliveryError::Rejected {
                status: 550,
                reason: format!("mailbox unavailable: {}", email.to()),
            });
        }
        state.delivered.push(email.clone());
        Ok(())
    }
}
