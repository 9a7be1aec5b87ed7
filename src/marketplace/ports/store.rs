//! Atomic write port.
//!
//! Every lifecycle operation stages its entity writes and notification
//! inserts in a [`UnitOfWork`] and commits it once. A commit applies all
//! staged writes or none of them.

use super::MarketplaceRepositoryResult;
use crate::marketplace::domain::{Application, Notification, Review, Task, TaskStatusKind};
use async_trait::async_trait;

/// Staged write to a task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWrite {
    /// Insert a newly posted task.
    Insert(Task),
    /// Replace a task only if it is still in `expected`.
    Transition {
        /// Task carrying its new status.
        task: Task,
        /// Status the stored row must still have.
        expected: TaskStatusKind,
    },
}

/// Staged write to an application row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationWrite {
    /// Insert a new application.
    Insert(Application),
    /// Replace an existing application.
    Update(Application),
}

/// Writes that must commit together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWork {
    tasks: Vec<TaskWrite>,
    applications: Vec<ApplicationWrite>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a task insert.
    pub fn insert_task(&mut self, task: Task) -> &mut Self {
        self.tasks.push(TaskWrite::Insert(task));
        self
    }

    /// Stages a conditional task update.
    pub fn transition_task(&mut self, task: Task, expected: TaskStatusKind) -> &mut Self {
        self.tasks.push(TaskWrite::Transition { task, expected });
        self
    }

    /// Stages an application insert.
    pub fn insert_application(&mut self, application: Application) -> &mut Self {
        self.applications.push(ApplicationWrite::Insert(application));
        self
    }

    /// Stages an application update.
    pub fn update_application(&mut self, application: Application) -> &mut Self {
        self.applications.push(ApplicationWrite::Update(application));
        self
    }

    /// Stages a review insert.
    pub fn insert_review(&mut self, review: Review) -> &mut Self {
        self.reviews.push(review);
        self
    }

    /// Stages a notification insert.
    pub fn save_notification(&mut self, notification: Notification) -> &mut Self {
        self.notifications.push(notification);
        self
    }

    /// Returns the staged task writes in staging order.
    #[must_use]
    pub fn task_writes(&self) -> &[TaskWrite] {
        &self.tasks
    }

    /// Returns the staged application writes in staging order.
    #[must_use]
    pub fn application_writes(&self) -> &[ApplicationWrite] {
        &self.applications
    }

    /// Returns the staged reviews.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Returns the staged notifications.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Returns `true` when nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.applications.is_empty()
            && self.reviews.is_empty()
            && self.notifications.is_empty()
    }
}

/// Atomic commit contract.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Applies every staged write, or none.
    ///
    /// # Errors
    ///
    /// Returns [`super::MarketplaceRepositoryError::StaleTask`] when a
    /// conditional transition lost a race, duplicate errors for uniqueness
    /// violations, or a persistence error. Nothing is written on error.
    async fn commit(&self, work: UnitOfWork) -> MarketplaceRepositoryResult<()>;
}
