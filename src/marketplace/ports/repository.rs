//! Read ports for marketplace aggregates.

use crate::identity::domain::UserId;
use crate::marketplace::domain::{
    Application, ApplicationId, Notification, Review, ReviewDirection, Task, TaskId,
    TaskStatusKind,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::MarketplaceStore;

/// Result type for marketplace repository operations.
pub type MarketplaceRepositoryResult<T> = Result<T, MarketplaceRepositoryError>;

/// Task lookup contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> MarketplaceRepositoryResult<Option<Task>>;

    /// Finds a task by identifier only when it is in `status`.
    async fn find_by_id_and_status(
        &self,
        id: TaskId,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Option<Task>>;

    /// Returns every task in `status`, most recently posted first.
    async fn find_by_status_newest_first(
        &self,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Vec<Task>>;
}

/// Application lookup contract.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Finds the application `applicant` made to `task_id`.
    async fn find_by_task_and_applicant(
        &self,
        task_id: TaskId,
        applicant: UserId,
    ) -> MarketplaceRepositoryResult<Option<Application>>;

    /// Returns every application to `task_id`, oldest first.
    async fn list_for_task(&self, task_id: TaskId)
    -> MarketplaceRepositoryResult<Vec<Application>>;
}

/// Review lookup contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Returns `true` when a review already exists for `direction`.
    async fn exists_for_direction(
        &self,
        direction: &ReviewDirection,
    ) -> MarketplaceRepositoryResult<bool>;

    /// Returns every review of `task_id`, in either direction, oldest first.
    async fn find_by_task_id(&self, task_id: TaskId) -> MarketplaceRepositoryResult<Vec<Review>>;

    /// Returns every review whose subject is `reviewee`, oldest first.
    async fn find_by_reviewee_id(&self, reviewee: UserId)
    -> MarketplaceRepositoryResult<Vec<Review>>;
}

/// Notification lookup contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Returns every notification addressed to `recipient`, newest first.
    async fn find_by_recipient(
        &self,
        recipient: UserId,
    ) -> MarketplaceRepositoryResult<Vec<Notification>>;
}

/// Everything a marketplace service needs from persistence.
pub trait MarketplaceRepository:
    TaskRepository + ApplicationRepository + ReviewRepository + NotificationRepository + MarketplaceStore
{
}

impl<T> MarketplaceRepository for T where
    T: TaskRepository
        + ApplicationRepository
        + ReviewRepository
        + NotificationRepository
        + MarketplaceStore
{
}

/// Errors returned by marketplace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MarketplaceRepositoryError {
    /// A conditional transition found the task in a different status.
    #[error("task {task_id} is no longer {expected}")]
    StaleTask {
        /// Task whose transition was refused.
        task_id: TaskId,
        /// Status the transition required.
        expected: TaskStatusKind,
    },

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The application was not found.
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),

    /// The applicant already applied to the task.
    #[error("user {applicant} already applied to task {task_id}")]
    DuplicateApplication {
        /// Task applied to.
        task_id: TaskId,
        /// Applying user.
        applicant: UserId,
    },

    /// The reviewer already reviewed the reviewee for the task.
    #[error("user {reviewer} already reviewed user {reviewee} for task {task_id}")]
    DuplicateReview {
        /// Reviewed task.
        task_id: TaskId,
        /// Author of the review.
        reviewer: UserId,
        /// Subject of the review.
        reviewee: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MarketplaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds the duplicate error for an existing review.
    #[must_use]
    pub const fn duplicate_review(direction: ReviewDirection) -> Self {
        Self::DuplicateReview {
            task_id: direction.task_id,
            reviewer: direction.reviewer,
            reviewee: direction.reviewee,
        }
    }
}
