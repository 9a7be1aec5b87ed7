//! Transactional notification staging.
//!
//! Notifications are staged into the caller's [`UnitOfWork`], so they commit
//! or roll back with the lifecycle change that promised them.

use crate::identity::domain::User;
use crate::marketplace::{
    domain::{Notification, NotificationContent, Task},
    ports::UnitOfWork,
};
use mockable::Clock;
use std::sync::Arc;

/// Builds lifecycle notifications and stages them for commit.
pub struct NotificationDispatcher<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> Clone for NotificationDispatcher<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> NotificationDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher stamping notifications with `clock`.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    fn stage(&self, work: &mut UnitOfWork, recipient: &User, content: NotificationContent) {
        work.save_notification(Notification::new(recipient.id(), content, &*self.clock));
    }

    /// Tells the poster that `applicant` applied.
    pub fn application_received(
        &self,
        work: &mut UnitOfWork,
        poster: &User,
        applicant: &User,
        task: &Task,
    ) {
        let content =
            NotificationContent::application_received(&applicant.full_name(), task.title());
        self.stage(work, poster, content);
    }

    /// Tells the selected applicant they were assigned.
    pub fn task_assigned(&self, work: &mut UnitOfWork, assignee: &User, task: &Task) {
        self.stage(work, assignee, NotificationContent::task_assigned(task.title()));
    }

    /// Tells both parties the task is complete and asks each to review the other.
    pub fn task_completed(&self, work: &mut UnitOfWork, poster: &User, assignee: &User, task: &Task) {
        self.stage(work, poster, NotificationContent::task_completed(task.title()));
        self.stage(work, assignee, NotificationContent::task_completed(task.title()));
        self.stage(
            work,
            poster,
            NotificationContent::review_reminder(assignee.first_name(), task.title()),
        );
        self.stage(
            work,
            assignee,
            NotificationContent::review_reminder(poster.first_name(), task.title()),
        );
    }
}
