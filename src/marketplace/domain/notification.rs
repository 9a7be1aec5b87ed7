//! Durable in-app notifications and the copy they carry.

use super::NotificationId;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Title and message of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    title: String,
    message: String,
}

impl NotificationContent {
    /// Tells an applicant they were selected.
    #[must_use]
    pub fn task_assigned(task_title: &str) -> Self {
        Self {
            title: "You've been assigned a task!".to_owned(),
            message: format!("You've been selected to complete: \"{task_title}\""),
        }
    }

    /// Tells a poster someone applied.
    #[must_use]
    pub fn application_received(applicant_name: &str, task_title: &str) -> Self {
        Self {
            title: "New application for your task".to_owned(),
            message: format!("{applicant_name} applied to \"{task_title}\""),
        }
    }

    /// Tells either party the task is finished.
    #[must_use]
    pub fn task_completed(task_title: &str) -> Self {
        Self {
            title: "Task completed!".to_owned(),
            message: format!("The task \"{task_title}\" has been marked as complete."),
        }
    }

    /// Asks one party to review `other_first_name`.
    #[must_use]
    pub fn review_reminder(other_first_name: &str, task_title: &str) -> Self {
        Self {
            title: "Review your recent gig!".to_owned(),
            message: format!(
                "{other_first_name} helped you with \"{task_title}\". Please take a moment to \
                 leave a review. Your feedback helps build trust in our community!"
            ),
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Append-only notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    content: NotificationContent,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification for `recipient`.
    #[must_use]
    pub fn new(recipient: UserId, content: NotificationContent, clock: &impl Clock) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            content,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: NotificationId,
        recipient: UserId,
        title: String,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipient,
            content: NotificationContent { title, message },
            created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.content.title()
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.content.message()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
