//! Service-level errors shared by the marketplace lifecycle services.

use crate::error::ErrorKind;
use crate::identity::domain::EmailAddress;
use crate::identity::ports::IdentityRepositoryError;
use crate::marketplace::domain::{
    MarketplaceDomainError, TaskId, TaskStatusKind, TaskTransitionError,
};
use crate::marketplace::ports::MarketplaceRepositoryError;
use thiserror::Error;

/// Entity a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingEntity {
    /// No task with this identifier.
    Task(TaskId),
    /// No task with this identifier is open.
    OpenTask(TaskId),
    /// No user owns this email address, or the value is not an address.
    User(String),
    /// The user never applied to the task.
    Application {
        /// Task looked up.
        task_id: TaskId,
        /// Applicant looked up.
        applicant: EmailAddress,
    },
}

impl std::fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task not found: {id}"),
            Self::OpenTask(id) => write!(f, "open task not found: {id}"),
            Self::User(email) => write!(f, "user not found with email: {email}"),
            Self::Application { task_id, applicant } => {
                write!(f, "application not found for {applicant} on task {task_id}")
            }
        }
    }
}

/// Reason an authorization check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Only the poster may perform the operation.
    NotPoster,
    /// Only the poster or the assignee may perform the operation.
    NotInvolved,
    /// Reviewer and reviewee must both be parties to the task.
    ReviewPartiesNotInvolved,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotPoster => "only the task poster can do this",
            Self::NotInvolved => "only the poster or the assignee can do this",
            Self::ReviewPartiesNotInvolved => "both users must be involved in the task",
        })
    }
}

/// Uniqueness rule a write would have broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplicate {
    /// One application per task and applicant.
    Application,
    /// One review per task, reviewer and reviewee.
    Review,
}

impl std::fmt::Display for Duplicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Application => "you have already applied to this task",
            Self::Review => "you have already reviewed this user for this task",
        })
    }
}

/// Errors returned by marketplace lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(MissingEntity),

    /// The acting user failed an authorization check.
    #[error("unauthorized: {0}")]
    Unauthorized(Denial),

    /// The task is not in the status the operation requires.
    #[error("task {task_id} is {actual}, expected {expected}")]
    InvalidState {
        /// Task the operation targeted.
        task_id: TaskId,
        /// Status the task is in.
        actual: TaskStatusKind,
        /// Status the operation requires.
        expected: TaskStatusKind,
    },

    /// Marketplace input failed validation.
    #[error(transparent)]
    InvalidArgument(#[from] MarketplaceDomainError),

    /// A poster tried to apply to their own task.
    #[error("you cannot apply to your own task")]
    SelfApplication,

    /// The write duplicates an existing record.
    #[error("{0}")]
    Conflict(Duplicate),

    /// Marketplace persistence failed.
    #[error(transparent)]
    Repository(MarketplaceRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
}

impl LifecycleError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidState { .. }
            | Self::InvalidArgument(MarketplaceDomainError::ApplicationAlreadyAccepted(_)) => {
                ErrorKind::InvalidState
            }
            Self::InvalidArgument(MarketplaceDomainError::InconsistentTaskStatus { .. })
            | Self::Repository(_)
            | Self::Identity(_) => ErrorKind::Infrastructure,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::SelfApplication => ErrorKind::InvalidOperation,
            Self::Conflict(_) => ErrorKind::Conflict,
        }
    }
}

impl From<TaskTransitionError> for LifecycleError {
    fn from(err: TaskTransitionError) -> Self {
        Self::InvalidState {
            task_id: err.task_id,
            actual: err.actual,
            expected: err.expected,
        }
    }
}

impl From<MarketplaceRepositoryError> for LifecycleError {
    fn from(err: MarketplaceRepositoryError) -> Self {
        match err {
            MarketplaceRepositoryError::DuplicateApplication { .. } => {
                Self::Conflict(Duplicate::Application)
            }
            MarketplaceRepositoryError::DuplicateReview { .. } => Self::Conflict(Duplicate::Review),
            MarketplaceRepositoryError::TaskNotFound(id) => Self::NotFound(MissingEntity::Task(id)),
            other => Self::Repository(other),
        }
    }
}

/// Result type for marketplace lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
