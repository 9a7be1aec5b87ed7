//! Task aggregate root and its status machine.

use super::{Budget, MarketplaceDomainError, ParseLabelError, TaskId, TaskTransitionError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a task asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Household cleaning.
    Cleaning,
    /// Garden and yard work.
    YardWork,
    /// Pet sitting and walking.
    PetCare,
    /// Lessons and homework help.
    Tutoring,
    /// Pickups and drop-offs.
    Delivery,
    /// General errands.
    Errands,
}

impl TaskCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::YardWork => "yard_work",
            Self::PetCare => "pet_care",
            Self::Tutoring => "tutoring",
            Self::Delivery => "delivery",
            Self::Errands => "errands",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseLabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cleaning" => Ok(Self::Cleaning),
            "yard_work" => Ok(Self::YardWork),
            "pet_care" => Ok(Self::PetCare),
            "tutoring" => Ok(Self::Tutoring),
            "delivery" => Ok(Self::Delivery),
            "errands" => Ok(Self::Errands),
            _ => Err(ParseLabelError::new("task category", value)),
        }
    }
}

/// Status label without the data each status carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatusKind {
    /// Accepting applications.
    Open,
    /// An applicant has been selected.
    Assigned,
    /// Work is finished.
    Completed,
}

impl TaskStatusKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatusKind {
    type Error = ParseLabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseLabelError::new("task status", value)),
        }
    }
}

impl fmt::Display for TaskStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status with the data each status owns.
///
/// An assignee exists exactly when the task is assigned or completed, and a
/// completion timestamp exactly when it is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepting applications.
    Open,
    /// Being worked on by `assignee`.
    Assigned {
        /// Selected applicant.
        assignee: UserId,
    },
    /// Finished by `assignee` at `completed_at`.
    Completed {
        /// Applicant who did the work.
        assignee: UserId,
        /// When the task was marked complete.
        completed_at: DateTime<Utc>,
    },
}

impl TaskStatus {
    /// Returns the status label.
    #[must_use]
    pub const fn kind(&self) -> TaskStatusKind {
        match self {
            Self::Open => TaskStatusKind::Open,
            Self::Assigned { .. } => TaskStatusKind::Assigned,
            Self::Completed { .. } => TaskStatusKind::Completed,
        }
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        match self {
            Self::Open => None,
            Self::Assigned { assignee } | Self::Completed { assignee, .. } => Some(*assignee),
        }
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Completed { completed_at, .. } => Some(*completed_at),
            Self::Open | Self::Assigned { .. } => None,
        }
    }

    /// Rebuilds a status from its flattened storage columns.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::InconsistentTaskStatus`] when the
    /// optional columns do not match the label.
    pub const fn from_columns(
        task_id: TaskId,
        kind: TaskStatusKind,
        assignee: Option<UserId>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, MarketplaceDomainError> {
        match (kind, assignee, completed_at) {
            (TaskStatusKind::Open, None, None) => Ok(Self::Open),
            (TaskStatusKind::Assigned, Some(assignee_id), None) => Ok(Self::Assigned {
                assignee: assignee_id,
            }),
            (TaskStatusKind::Completed, Some(assignee_id), Some(timestamp)) => {
                Ok(Self::Completed {
                    assignee: assignee_id,
                    completed_at: timestamp,
                })
            }
            _ => Err(MarketplaceDomainError::InconsistentTaskStatus {
                task_id,
                status: kind,
            }),
        }
    }
}

/// Validated input for posting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
    category: TaskCategory,
    budget: Budget,
    address: String,
    requirements: Option<String>,
}

impl NewTask {
    /// Creates task input.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::EmptyField`] when the title,
    /// description or address is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TaskCategory,
        budget: Budget,
        address: impl Into<String>,
    ) -> Result<Self, MarketplaceDomainError> {
        Ok(Self {
            title: required(title.into(), "title")?,
            description: required(description.into(), "description")?,
            category,
            budget,
            address: required(address.into(), "address")?,
            requirements: None,
        })
    }

    /// Sets free-text requirements; blank text is ignored.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        let text = requirements.into().trim().to_owned();
        self.requirements = (!text.is_empty()).then_some(text);
        self
    }
}

fn required(value: String, field: &'static str) -> Result<String, MarketplaceDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MarketplaceDomainError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    category: TaskCategory,
    budget: Budget,
    address: String,
    requirements: Option<String>,
    poster: UserId,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category.
    pub category: TaskCategory,
    /// Persisted budget.
    pub budget: Budget,
    /// Persisted address.
    pub address: String,
    /// Persisted requirements, if any.
    pub requirements: Option<String>,
    /// Persisted poster.
    pub poster: UserId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task posted by `poster`.
    #[must_use]
    pub fn post(new_task: NewTask, poster: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: new_task.title,
            description: new_task.description,
            category: new_task.category,
            budget: new_task.budget,
            address: new_task.address,
            requirements: new_task.requirements,
            poster,
            status: TaskStatus::Open,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            category: data.category,
            budget: data.budget,
            address: data.address,
            requirements: data.requirements,
            poster: data.poster,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget(&self) -> Budget {
        self.budget
    }

    /// Returns the street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the requirements, if any.
    #[must_use]
    pub fn requirements(&self) -> Option<&str> {
        self.requirements.as_deref()
    }

    /// Returns the user who posted the task.
    #[must_use]
    pub const fn poster(&self) -> UserId {
        self.poster
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.status.assignee()
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.status.completed_at()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves an open task to assigned.
    ///
    /// Callers must have checked that the actor is the poster and that
    /// `assignee` applied.
    pub(crate) fn assign(
        &mut self,
        assignee: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskTransitionError> {
        self.require(TaskStatusKind::Open)?;
        self.status = TaskStatus::Assigned { assignee };
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Moves an assigned task to completed and returns the assignee.
    pub(crate) fn complete(&mut self, clock: &impl Clock) -> Result<UserId, TaskTransitionError> {
        let TaskStatus::Assigned { assignee } = self.status else {
            return Err(self.transition_error(TaskStatusKind::Assigned));
        };
        let timestamp = clock.utc();
        self.status = TaskStatus::Completed {
            assignee,
            completed_at: timestamp,
        };
        self.updated_at = timestamp;
        Ok(assignee)
    }

    /// Fails unless the task is in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskTransitionError`] naming the actual status.
    pub fn require(&self, expected: TaskStatusKind) -> Result<(), TaskTransitionError> {
        if self.status.kind() == expected {
            return Ok(());
        }
        Err(self.transition_error(expected))
    }

    const fn transition_error(&self, expected: TaskStatusKind) -> TaskTransitionError {
        TaskTransitionError {
            task_id: self.id,
            actual: self.status.kind(),
            expected,
        }
    }
}
