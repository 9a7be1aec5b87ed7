//! Error types for marketplace domain validation and transitions.

use super::{ApplicationId, TaskId, TaskStatusKind};
use thiserror::Error;

/// Errors returned while constructing or mutating marketplace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketplaceDomainError {
    /// A required text field is blank after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The budget text is not a non-negative amount with at most two decimals.
    #[error("invalid budget amount '{0}'")]
    MalformedBudget(String),

    /// The budget is below the marketplace minimum.
    #[error("budget must be at least 20.00, got {0}")]
    BudgetBelowMinimum(String),

    /// The rating falls outside `1..=5`.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    /// The application was already accepted.
    #[error("application {0} has already been accepted")]
    ApplicationAlreadyAccepted(ApplicationId),

    /// Persisted task columns disagree with the task status.
    #[error("persisted task {task_id} has inconsistent columns for status {status}")]
    InconsistentTaskStatus {
        /// Task whose row is inconsistent.
        task_id: TaskId,
        /// Stored status label.
        status: TaskStatusKind,
    },
}

/// Error returned when a task is not in the state a transition requires.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("task {task_id} is {actual}, expected {expected}")]
pub struct TaskTransitionError {
    /// Task that refused the transition.
    pub task_id: TaskId,
    /// Status the task is in.
    pub actual: TaskStatusKind,
    /// Status the transition requires.
    pub expected: TaskStatusKind,
}

/// Error returned while parsing stored enum labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseLabelError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// Rejected label.
    pub value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
