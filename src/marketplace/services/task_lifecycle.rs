//! Task lifecycle: posting, assignment and completion.

use super::{
    Denial, LifecycleEmails, LifecycleError, LifecycleResult, MissingEntity,
    NotificationDispatcher, lookup,
};
use crate::identity::{domain::EmailAddress, ports::UserRepository};
use crate::mailer::ports::EmailSender;
use crate::marketplace::{
    domain::{Budget, NewTask, Task, TaskCategory, TaskId, TaskStatusKind, guard},
    ports::{MarketplaceRepository, UnitOfWork},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for posting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTaskRequest {
    title: String,
    description: String,
    category: TaskCategory,
    budget: String,
    address: String,
    requirements: Option<String>,
}

impl PostTaskRequest {
    /// Creates a request; `budget` is a decimal amount such as `"50.00"`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TaskCategory,
        budget: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            budget: budget.into(),
            address: address.into(),
            requirements: None,
        }
    }

    /// Sets free-text requirements.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }
}

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    marketplace: Arc<M>,
    users: Arc<U>,
    notifications: NotificationDispatcher<C>,
    emails: LifecycleEmails<E>,
    clock: Arc<C>,
}

impl<M, U, E, C> Clone for TaskLifecycleService<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            marketplace: Arc::clone(&self.marketplace),
            users: Arc::clone(&self.users),
            notifications: self.notifications.clone(),
            emails: self.emails.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<M, U, E, C> TaskLifecycleService<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(marketplace: Arc<M>, users: Arc<U>, mailer: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            marketplace,
            users,
            notifications: NotificationDispatcher::new(Arc::clone(&clock)),
            emails: LifecycleEmails::new(mailer),
            clock,
        }
    }

    /// Posts an open task on behalf of `poster_email`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown poster,
    /// [`LifecycleError::InvalidArgument`] for blank fields or a budget below
    /// 20.00, or a repository error.
    pub async fn create(&self, request: PostTaskRequest, poster_email: &str) -> LifecycleResult<Task> {
        let poster = lookup::user_by_email(&*self.users, poster_email).await?;

        let budget = Budget::parse(&request.budget)?;
        let mut new_task = NewTask::new(
            request.title,
            request.description,
            request.category,
            budget,
            request.address,
        )?;
        if let Some(requirements) = request.requirements {
            new_task = new_task.with_requirements(requirements);
        }

        let task = Task::post(new_task, poster.id(), &*self.clock);
        let mut work = UnitOfWork::new();
        work.insert_task(task.clone());
        self.marketplace.commit(work).await?;
        info!(task_id = %task.id(), poster_id = %poster.id(), "task posted");
        Ok(task)
    }

    /// Assigns an open task to one of its applicants.
    ///
    /// Accepts the applicant's application, moves the task to assigned and
    /// notifies the applicant in one commit. Of two concurrent callers only
    /// one succeeds; the other receives [`LifecycleError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown task, user or
    /// application, [`LifecycleError::Unauthorized`] when `poster_email` did
    /// not post the task, [`LifecycleError::InvalidState`] when the task is
    /// not open, or a repository error.
    pub async fn assign(
        &self,
        task_id: TaskId,
        applicant_email: &str,
        poster_email: &str,
    ) -> LifecycleResult<Task> {
        let mut task = lookup::task_by_id(&*self.marketplace, task_id).await?;
        let poster = lookup::user_by_email(&*self.users, poster_email).await?;
        let applicant = lookup::user_by_email(&*self.users, applicant_email).await?;

        if !guard::is_poster(poster.id(), &task) {
            return Err(LifecycleError::Unauthorized(Denial::NotPoster));
        }
        task.require(TaskStatusKind::Open)?;

        let mut application = self
            .marketplace
            .find_by_task_and_applicant(task_id, applicant.id())
            .await?
            .ok_or_else(|| missing_application(task_id, applicant.email()))?;
        application.accept()?;
        task.assign(applicant.id(), &*self.clock)?;

        let mut work = UnitOfWork::new();
        work.transition_task(task.clone(), TaskStatusKind::Open)
            .update_application(application);
        self.notifications.task_assigned(&mut work, &applicant, &task);
        lookup::commit_transition(&*self.marketplace, work).await?;
        info!(task_id = %task_id, assignee_id = %applicant.id(), "task assigned");

        self.emails.task_assigned(&applicant, &task).await;
        Ok(task)
    }

    /// Marks an assigned task complete.
    ///
    /// Both parties receive a completion notification and a review reminder
    /// in the same commit, then a best-effort email each.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown task or user,
    /// [`LifecycleError::Unauthorized`] when the actor is neither poster nor
    /// assignee, [`LifecycleError::InvalidState`] when the task is not
    /// assigned, or a repository error.
    pub async fn complete(&self, task_id: TaskId, acting_email: &str) -> LifecycleResult<Task> {
        let mut task = lookup::task_by_id(&*self.marketplace, task_id).await?;
        let actor = lookup::user_by_email(&*self.users, acting_email).await?;

        if !guard::is_involved(actor.id(), &task) {
            return Err(LifecycleError::Unauthorized(Denial::NotInvolved));
        }
        let assignee_id = task.complete(&*self.clock)?;

        let poster = lookup::user_by_id(&*self.users, task.poster()).await?;
        let assignee = lookup::user_by_id(&*self.users, assignee_id).await?;

        let mut work = UnitOfWork::new();
        work.transition_task(task.clone(), TaskStatusKind::Assigned);
        self.notifications
            .task_completed(&mut work, &poster, &assignee, &task);
        lookup::commit_transition(&*self.marketplace, work).await?;
        info!(task_id = %task_id, completed_by = %actor.id(), "task completed");

        self.emails.task_completed(&poster, &assignee, &task).await;
        Ok(task)
    }

    /// Loads a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, task_id: TaskId) -> LifecycleResult<Task> {
        lookup::task_by_id(&*self.marketplace, task_id).await
    }

    /// Lists open tasks, most recently posted first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn list_open_tasks(&self) -> LifecycleResult<Vec<Task>> {
        Ok(self
            .marketplace
            .find_by_status_newest_first(TaskStatusKind::Open)
            .await?)
    }
}

fn missing_application(task_id: TaskId, applicant: &EmailAddress) -> LifecycleError {
    LifecycleError::NotFound(MissingEntity::Application {
        task_id,
        applicant: applicant.clone(),
    })
}
