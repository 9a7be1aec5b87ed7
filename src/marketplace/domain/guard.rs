//! Authorization predicates over a user and a task.
//!
//! Every mutating marketplace operation consults these before touching
//! state. They are pure and never fail; callers turn a `false` into an
//! unauthorized error.

use super::Task;
use crate::identity::domain::UserId;

/// Returns `true` when `user` posted `task`.
#[must_use]
pub fn is_poster(user: UserId, task: &Task) -> bool {
    task.poster() == user
}

/// Returns `true` when `user` is the task's assignee.
#[must_use]
pub fn is_assignee(user: UserId, task: &Task) -> bool {
    task.assignee() == Some(user)
}

/// Returns `true` when `user` is the poster or the assignee.
#[must_use]
pub fn is_involved(user: UserId, task: &Task) -> bool {
    is_poster(user, task) || is_assignee(user, task)
}
