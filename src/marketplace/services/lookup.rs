//! Lookups shared by the lifecycle services.

use super::{LifecycleError, LifecycleResult, MissingEntity};
use crate::identity::{
    domain::{EmailAddress, User, UserId},
    ports::{IdentityRepositoryError, UserRepository},
};
use crate::marketplace::{
    domain::{Task, TaskId, TaskStatusKind},
    ports::{MarketplaceRepositoryError, MarketplaceStore, TaskRepository, UnitOfWork},
};

/// Resolves a user by email address.
///
/// A malformed address resolves to [`MissingEntity::User`] like any other
/// unknown email.
pub(super) async fn user_by_email<U>(users: &U, email: &str) -> LifecycleResult<User>
where
    U: UserRepository + ?Sized,
{
    let missing = || LifecycleError::NotFound(MissingEntity::User(email.to_owned()));
    let Ok(address) = EmailAddress::new(email) else {
        return Err(missing());
    };
    users.find_by_email(&address).await?.ok_or_else(missing)
}

/// Loads a user the marketplace already references by identifier.
pub(super) async fn user_by_id<U>(users: &U, id: UserId) -> LifecycleResult<User>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await?
        .ok_or(LifecycleError::Identity(IdentityRepositoryError::UserNotFound(id)))
}

/// Loads a task by identifier.
pub(super) async fn task_by_id<M>(marketplace: &M, id: TaskId) -> LifecycleResult<Task>
where
    M: TaskRepository + ?Sized,
{
    marketplace
        .find_by_id(id)
        .await?
        .ok_or(LifecycleError::NotFound(MissingEntity::Task(id)))
}

/// Commits `work`, reporting a lost transition race as the task's new state.
pub(super) async fn commit_transition<M>(marketplace: &M, work: UnitOfWork) -> LifecycleResult<()>
where
    M: TaskRepository + MarketplaceStore + ?Sized,
{
    match marketplace.commit(work).await {
        Ok(()) => Ok(()),
        Err(MarketplaceRepositoryError::StaleTask { task_id, expected }) => {
            Err(stale_task(marketplace, task_id, expected).await)
        }
        Err(other) => Err(other.into()),
    }
}

async fn stale_task<M>(marketplace: &M, task_id: TaskId, expected: TaskStatusKind) -> LifecycleError
where
    M: TaskRepository + ?Sized,
{
    match task_by_id(marketplace, task_id).await {
        Ok(task) => LifecycleError::InvalidState {
            task_id,
            actual: task.status().kind(),
            expected,
        },
        Err(err) => err,
    }
}
