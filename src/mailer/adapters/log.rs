//! Mailer that writes emails to the log instead of delivering them.

use async_trait::async_trait;
use tracing::info;

use crate::mailer::{
    domain::OutgoingEmail,
    ports::{EmailDeliveryResult, EmailSender},
};

/// Development mailer used when no relay is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl EmailSender for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> EmailDeliveryResult<()> {
        info!(
            to = %email.to(),
            subject = email.subject(),
            html = email.is_html(),
            "email delivery skipped: no relay configured"
        );
        Ok(())
    }
}
