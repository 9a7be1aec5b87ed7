//! Outgoing email envelope handed to the delivery collaborator.

use crate::identity::domain::EmailAddress;
use serde::Serialize;

/// Fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    to: EmailAddress,
    subject: String,
    body: String,
    html: bool,
}

impl OutgoingEmail {
    /// Creates a plain-text email.
    #[must_use]
    pub fn plain_text(
        to: EmailAddress,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
            html: false,
        }
    }

    /// Marks the body as HTML.
    #[must_use]
    pub const fn as_html(mut self) -> Self {
        self.html = true;
        self
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn to(&self) -> &EmailAddress {
        &self.to
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` when the body is HTML.
    #[must_use]
    pub const fn is_html(&self) -> bool {
        self.html
    }
}
