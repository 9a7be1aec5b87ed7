//! In-memory marketplace repository for tests and local development.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::domain::UserId;
use crate::marketplace::{
    domain::{
        Application, Notification, Review, ReviewDirection, Task, TaskId, TaskStatusKind,
    },
    ports::{
        ApplicationRepository, ApplicationWrite, MarketplaceRepositoryError,
        MarketplaceRepositoryResult, MarketplaceStore, NotificationRepository, ReviewRepository,
        TaskRepository, TaskWrite, UnitOfWork,
    },
};

/// Thread-safe in-memory marketplace repository.
///
/// A commit validates every staged write under one write lock before
/// applying any of them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplace {
    state: Arc<RwLock<MarketplaceState>>,
}

#[derive(Debug, Default)]
struct MarketplaceState {
    tasks: HashMap<TaskId, Task>,
    posting_order: Vec<TaskId>,
    applications: Vec<Application>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
    reject_notifications: bool,
}

impl InMemoryMarketplace {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later commit that stages a notification fail.
    pub fn reject_notification_writes(&self) {
        if let Ok(mut state) = self.state.write() {
            state.reject_notifications = true;
        }
    }

    /// Returns every stored notification in insertion order.
    #[must_use]
    pub fn all_notifications(&self) -> Vec<Notification> {
        self.state
            .read()
            .map(|state| state.notifications.clone())
            .unwrap_or_default()
    }

    fn read(&self) -> MarketplaceRepositoryResult<RwLockReadGuard<'_, MarketplaceState>> {
        self.state.read().map_err(|err| {
            MarketplaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> MarketplaceRepositoryResult<RwLockWriteGuard<'_, MarketplaceState>> {
        self.state.write().map_err(|err| {
            MarketplaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl MarketplaceState {
    fn validate(&self, work: &UnitOfWork) -> MarketplaceRepositoryResult<()> {
        if self.reject_notifications && !work.notifications().is_empty() {
            return Err(MarketplaceRepositoryError::persistence(std::io::Error::other(
                "notification insert rejected",
            )));
        }
        self.validate_tasks(work.task_writes())?;
        self.validate_applications(work.application_writes())?;
        self.validate_reviews(work.reviews())
    }

    fn validate_tasks(&self, writes: &[TaskWrite]) -> MarketplaceRepositoryResult<()> {
        let mut inserted = HashSet::new();
        for write in writes {
            match write {
                TaskWrite::Insert(task) => {
                    if self.tasks.contains_key(&task.id()) || !inserted.insert(task.id()) {
                        return Err(MarketplaceRepositoryError::DuplicateTask(task.id()));
                    }
                }
                TaskWrite::Transition { task, expected } => {
                    let stored = self
                        .tasks
                        .get(&task.id())
                        .ok_or(MarketplaceRepositoryError::TaskNotFound(task.id()))?;
                    if stored.status().kind() != *expected {
                        return Err(MarketplaceRepositoryError::StaleTask {
                            task_id: task.id(),
                            expected: *expected,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_applications(&self, writes: &[ApplicationWrite]) -> MarketplaceRepositoryResult<()> {
        let mut pairs: HashSet<(TaskId, UserId)> = self
            .applications
            .iter()
            .map(|application| (application.task_id(), application.applicant()))
            .collect();
        for write in writes {
            match write {
                ApplicationWrite::Insert(application) => {
                    if !pairs.insert((application.task_id(), application.applicant())) {
                        return Err(MarketplaceRepositoryError::DuplicateApplication {
                            task_id: application.task_id(),
                            applicant: application.applicant(),
                        });
                    }
                }
                ApplicationWrite::Update(application) => {
                    if !self
                        .applications
                        .iter()
                        .any(|stored| stored.id() == application.id())
                    {
                        return Err(MarketplaceRepositoryError::ApplicationNotFound(
                            application.id(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_reviews(&self, reviews: &[Review]) -> MarketplaceRepositoryResult<()> {
        let mut directions: HashSet<ReviewDirection> =
            self.reviews.iter().map(Review::direction).collect();
        for review in reviews {
            if !directions.insert(review.direction()) {
                return Err(MarketplaceRepositoryError::duplicate_review(
                    review.direction(),
                ));
            }
        }
        Ok(())
    }

    fn apply(&mut self, work: &UnitOfWork) {
        for write in work.task_writes() {
            match write {
                TaskWrite::Insert(task) => {
                    self.posting_order.push(task.id());
                    self.tasks.insert(task.id(), task.clone());
                }
                TaskWrite::Transition { task, .. } => {
                    self.tasks.insert(task.id(), task.clone());
                }
            }
        }
        for write in work.application_writes() {
            match write {
                ApplicationWrite::Insert(application) => {
                    self.applications.push(application.clone());
                }
                ApplicationWrite::Update(application) => {
                    if let Some(stored) = self
                        .applications
                        .iter_mut()
                        .find(|stored| stored.id() == application.id())
                    {
                        *stored = application.clone();
                    }
                }
            }
        }
        self.reviews.extend_from_slice(work.reviews());
        self.notifications.extend_from_slice(work.notifications());
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryMarketplace {
    async fn commit(&self, work: UnitOfWork) -> MarketplaceRepositoryResult<()> {
        let mut state = self.write()?;
        state.validate(&work)?;
        state.apply(&work);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryMarketplace {
    async fn find_by_id(&self, id: TaskId) -> MarketplaceRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn find_by_id_and_status(
        &self,
        id: TaskId,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Option<Task>> {
        Ok(self
            .read()?
            .tasks
            .get(&id)
            .filter(|task| task.status().kind() == status)
            .cloned())
    }

    async fn find_by_status_newest_first(
        &self,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .posting_order
            .iter()
            .rev()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| task.status().kind() == status)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryMarketplace {
    async fn find_by_task_and_applicant(
        &self,
        task_id: TaskId,
        applicant: UserId,
    ) -> MarketplaceRepositoryResult<Option<Application>> {
        Ok(self
            .read()?
            .applications
            .iter()
            .find(|application| {
                application.task_id() == task_id && application.applicant() == applicant
            })
            .cloned())
    }

    async fn list_for_task(
        &self,
        task_id: TaskId,
    ) -> MarketplaceRepositoryResult<Vec<Application>> {
        Ok(self
            .read()?
            .applications
            .iter()
            .filter(|application| application.task_id() == task_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryMarketplace {
    async fn exists_for_direction(
        &self,
        direction: &ReviewDirection,
    ) -> MarketplaceRepositoryResult<bool> {
        Ok(self
            .read()?
            .reviews
            .iter()
            .any(|review| review.direction() == *direction))
    }

    async fn find_by_task_id(&self, task_id: TaskId) -> MarketplaceRepositoryResult<Vec<Review>> {
        Ok(self
            .read()?
            .reviews
            .iter()
            .filter(|review| review.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn find_by_reviewee_id(
        &self,
        reviewee: UserId,
    ) -> MarketplaceRepositoryResult<Vec<Review>> {
        Ok(self
            .read()?
            .reviews
            .iter()
            .filter(|review| review.reviewee() == reviewee)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryMarketplace {
    async fn find_by_recipient(
        &self,
        recipient: UserId,
    ) -> MarketplaceRepositoryResult<Vec<Notification>> {
        Ok(self
            .read()?
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.recipient() == recipient)
            .cloned()
            .collect())
    }
}
