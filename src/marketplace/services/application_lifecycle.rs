//! Application lifecycle: applying to open tasks.
//!
//! Acceptance is not exposed here; it happens only inside task assignment.

use super::{
    Denial, Duplicate, LifecycleEmails, LifecycleError, LifecycleResult, MissingEntity,
    NotificationDispatcher, lookup,
};
use crate::identity::ports::UserRepository;
use crate::mailer::ports::EmailSender;
use crate::marketplace::{
    domain::{Application, TaskId, TaskStatusKind, guard},
    ports::{MarketplaceRepository, UnitOfWork},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Application lifecycle orchestration service.
#[derive(Clone)]
pub struct ApplicationLifecycleService<M, U, E, C>
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

impl<M, U, E, C> ApplicationLifecycleService<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    /// Creates a new application lifecycle service.
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

    /// Applies to an open task and notifies its poster.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] when the task does not exist or is
    /// not open, or the applicant is unknown;
    /// [`LifecycleError::SelfApplication`] when the poster applies to their
    /// own task; [`LifecycleError::Conflict`] when the applicant already
    /// applied; or a repository error.
    pub async fn apply(
        &self,
        task_id: TaskId,
        applicant_email: &str,
        message: Option<String>,
    ) -> LifecycleResult<Application> {
        let task = self
            .marketplace
            .find_by_id_and_status(task_id, TaskStatusKind::Open)
            .await?
            .ok_or(LifecycleError::NotFound(MissingEntity::OpenTask(task_id)))?;
        let applicant = lookup::user_by_email(&*self.users, applicant_email).await?;
        let poster = lookup::user_by_id(&*self.users, task.poster()).await?;

        if applicant.email() == poster.email() {
            return Err(LifecycleError::SelfApplication);
        }
        if self
            .marketplace
            .find_by_task_and_applicant(task_id, applicant.id())
            .await?
            .is_some()
        {
            return Err(LifecycleError::Conflict(Duplicate::Application));
        }

        let application = Application::submit(task_id, applicant.id(), message, &*self.clock);
        let mut work = UnitOfWork::new();
        work.insert_application(application.clone());
        self.notifications
            .application_received(&mut work, &poster, &applicant, &task);
        self.marketplace.commit(work).await?;
        info!(
            task_id = %task_id,
            application_id = %application.id(),
            applicant_id = %applicant.id(),
            "application submitted"
        );

        self.emails
            .application_received(&poster, &applicant, &task)
            .await;
        Ok(application)
    }

    /// Lists a task's applications for its poster, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown task or user,
    /// [`LifecycleError::Unauthorized`] when `poster_email` did not post the
    /// task, or a repository error.
    pub async fn list_applications(
        &self,
        task_id: TaskId,
        poster_email: &str,
    ) -> LifecycleResult<Vec<Application>> {
        let task = lookup::task_by_id(&*self.marketplace, task_id).await?;
        let poster = lookup::user_by_email(&*self.users, poster_email).await?;
        if !guard::is_poster(poster.id(), &task) {
            return Err(LifecycleError::Unauthorized(Denial::NotPoster));
        }
        Ok(self.marketplace.list_for_task(task_id).await?)
    }
}
