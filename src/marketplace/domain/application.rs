//! Applications submitted by workers to open tasks.

use super::{ApplicationId, MarketplaceDomainError, ParseLabelError, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Application status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Waiting for the poster's decision.
    Pending,
    /// Selected by the poster; the task is assigned to the applicant.
    Accepted,
}

impl ApplicationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ParseLabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            _ => Err(ParseLabelError::new("application status", value)),
        }
    }
}

/// A worker's application to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    task_id: TaskId,
    applicant: UserId,
    message: Option<String>,
    status: ApplicationStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted application identifier.
    pub id: ApplicationId,
    /// Task applied to.
    pub task_id: TaskId,
    /// Applying user.
    pub applicant: UserId,
    /// Cover message, if any.
    pub message: Option<String>,
    /// Persisted status.
    pub status: ApplicationStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Creates a pending application. A blank message is dropped.
    #[must_use]
    pub fn submit(
        task_id: TaskId,
        applicant: UserId,
        message: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ApplicationId::new(),
            task_id,
            applicant,
            message: message
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            status: ApplicationStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedApplicationData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            applicant: data.applicant,
            message: data.message,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the task applied to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the applying user.
    #[must_use]
    pub const fn applicant(&self) -> UserId {
        self.applicant
    }

    /// Returns the cover message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the application accepted.
    ///
    /// Only reachable through task assignment, which moves the task out of
    /// `open` in the same unit of work.
    pub(crate) const fn accept(&mut self) -> Result<(), MarketplaceDomainError> {
        if matches!(self.status, ApplicationStatus::Accepted) {
            return Err(MarketplaceDomainError::ApplicationAlreadyAccepted(self.id));
        }
        self.status = ApplicationStatus::Accepted;
        Ok(())
    }
}
