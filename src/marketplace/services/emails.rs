//! Best-effort lifecycle emails, sent only after a successful commit.

use crate::identity::domain::User;
use crate::mailer::{
    domain::{CompletionAudience, EmailNotice},
    ports::EmailSender,
    services::EmailDispatcher,
};
use crate::marketplace::domain::Task;
use std::sync::Arc;

/// Sends the lifecycle emails; every failure is logged and dropped.
pub struct LifecycleEmails<E>
where
    E: EmailSender,
{
    dispatcher: EmailDispatcher<E>,
}

impl<E> Clone for LifecycleEmails<E>
where
    E: EmailSender,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<E> LifecycleEmails<E>
where
    E: EmailSender,
{
    /// Creates the email side of the lifecycle services.
    #[must_use]
    pub const fn new(sender: Arc<E>) -> Self {
        Self {
            dispatcher: EmailDispatcher::new(sender),
        }
    }

    /// Emails the poster about a new application.
    pub async fn application_received(&self, poster: &User, applicant: &User, task: &Task) {
        let notice = EmailNotice::ApplicationReceived {
            poster_first_name: poster.first_name().to_owned(),
            applicant_name: applicant.full_name(),
            task_title: task.title().to_owned(),
        };
        self.dispatcher.deliver(poster.email(), &notice).await;
    }

    /// Emails the selected applicant.
    pub async fn task_assigned(&self, assignee: &User, task: &Task) {
        let notice = EmailNotice::TaskAssigned {
            first_name: assignee.first_name().to_owned(),
            task_title: task.title().to_owned(),
        };
        self.dispatcher.deliver(assignee.email(), &notice).await;
    }

    /// Emails both parties; one failed delivery does not stop the other.
    pub async fn task_completed(&self, poster: &User, assignee: &User, task: &Task) {
        for (recipient, audience) in [
            (poster, CompletionAudience::Poster),
            (assignee, CompletionAudience::Completer),
        ] {
            let notice = EmailNotice::TaskCompleted {
                first_name: recipient.first_name().to_owned(),
                task_title: task.title().to_owned(),
                audience,
            };
            self.dispatcher.deliver(recipient.email(), &notice).await;
        }
    }
}
