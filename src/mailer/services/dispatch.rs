//! Best-effort email dispatch.
//!
//! Every failure (rendering or delivery) ends here as a logged warning. The
//! dispatcher has no error return type, so a lifecycle operation cannot
//! propagate an email failure even by accident.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::identity::domain::EmailAddress;
use crate::mailer::{
    domain::{EmailNotice, NoticeRenderError, OutgoingEmail},
    ports::{EmailDeliveryError, EmailSender},
};

/// Result of a best-effort delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The delivery collaborator accepted the email.
    Delivered,
    /// Rendering or delivery failed; the failure has been logged.
    Failed,
}

#[derive(Debug, Error)]
enum DispatchFailure {
    #[error(transparent)]
    Render(#[from] NoticeRenderError),
    #[error(transparent)]
    Delivery(#[from] EmailDeliveryError),
}

/// Renders notices and hands them to an [`EmailSender`], isolating failures.
pub struct EmailDispatcher<E>
where
    E: EmailSender,
{
    sender: Arc<E>,
}

impl<E> Clone for EmailDispatcher<E>
where
    E: EmailSender,
{
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<E> EmailDispatcher<E>
where
    E: EmailSender,
{
    /// Creates a dispatcher around a delivery adapter.
    #[must_use]
    pub const fn new(sender: Arc<E>) -> Self {
        Self { sender }
    }

    /// Attempts to deliver `notice` to `recipient`.
    ///
    /// Never fails: errors are logged at `warn` and reported as
    /// [`DeliveryOutcome::Failed`].
    pub async fn deliver(&self, recipient: &EmailAddress, notice: &EmailNotice) -> DeliveryOutcome {
        match self.try_deliver(recipient, notice).await {
            Ok(()) => {
                debug!(to = %recipient, template = notice.template_name(), "email delivered");
                DeliveryOutcome::Delivered
            }
            Err(failure) => {
                warn!(
                    to = %recipient,
                    template = notice.template_name(),
                    error = %failure,
                    "failed to send email"
                );
                DeliveryOutcome::Failed
            }
        }
    }

    async fn try_deliver(
        &self,
        recipient: &EmailAddress,
        notice: &EmailNotice,
    ) -> Result<(), DispatchFailure> {
        let rendered = notice.render()?;
        let email = OutgoingEmail::plain_text(recipient.clone(), rendered.subject, rendered.body);
        self.sender.send(&email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::ports::MockEmailSender;
    use rstest::{fixture, rstest};

    #[fixture]
    fn recipient() -> EmailAddress {
        EmailAddress::new("helper@example.test").expect("valid email")
    }

    fn assigned_notice() -> EmailNotice {
        EmailNotice::TaskAssigned {
            first_name: "Sipho".to_owned(),
            task_title: "Fix the gate".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn deliver_sends_rendered_plain_text_email(recipient: EmailAddress) {
        let mut sender = MockEmailSender::new();
        let expected_to = recipient.clone();
        sender
            .expect_send()
            .withf(move |email| {
                email.to() == &expected_to
                    && !email.is_html()
                    && email.body().contains("Fix the gate")
            })
            .times(1)
            .returning(|_| Ok(()));
        let dispatcher = EmailDispatcher::new(Arc::new(sender));

        let outcome = dispatcher.deliver(&recipient, &assigned_notice()).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn deliver_reports_failure_without_error(recipient: EmailAddress) {
        let mut sender = MockEmailSender::new();
        sender.expect_send().times(1).returning(|_| {
            Err(EmailDeliveryError::Rejected {
                status: 503,
                reason: "relay down".to_owned(),
            })
        });
        let dispatcher = EmailDispatcher::new(Arc::new(sender));

        let outcome = dispatcher.deliver(&recipient, &assigned_notice()).await;

        assert_eq!(outcome, DeliveryOutcome::Failed);
    }
}
