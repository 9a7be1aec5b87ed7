//! `PostgreSQL` repository implementation for the marketplace.

use super::{
    models::{ApplicationRow, NotificationRow, ReviewRow, TaskRow, TaskStatusChangeset},
    schema::{applications, notifications, reviews, tasks},
};
use crate::identity::domain::UserId;
use crate::marketplace::{
    domain::{
        Application, ApplicationId, ApplicationStatus, Budget, Notification, NotificationId,
        PersistedApplicationData, PersistedReviewData, PersistedTaskData, Rating, Review,
        ReviewDirection, ReviewId, Task, TaskCategory, TaskId, TaskStatus, TaskStatusKind,
    },
    ports::{
        ApplicationRepository, ApplicationWrite, MarketplaceRepositoryError,
        MarketplaceRepositoryResult, MarketplaceStore, NotificationRepository, ReviewRepository,
        TaskRepository, TaskWrite, UnitOfWork,
    },
};
use crate::postgres::{PgPool, run_blocking};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed marketplace repository.
#[derive(Debug, Clone)]
pub struct PostgresMarketplace {
    pool: PgPool,
}

impl PostgresMarketplace {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, operation: F) -> MarketplaceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MarketplaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            operation,
            MarketplaceRepositoryError::persistence,
            MarketplaceRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for MarketplaceRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

const fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[async_trait]
impl MarketplaceStore for PostgresMarketplace {
    async fn commit(&self, work: UnitOfWork) -> MarketplaceRepositoryResult<()> {
        self.run(move |connection| {
            connection.transaction::<_, MarketplaceRepositoryError, _>(|tx| {
                for write in work.task_writes() {
                    write_task(tx, write)?;
                }
                for write in work.application_writes() {
                    write_application(tx, write)?;
                }
                for review in work.reviews() {
                    insert_review(tx, review)?;
                }
                let notification_rows: Vec<NotificationRow> =
                    work.notifications().iter().map(to_notification_row).collect();
                if !notification_rows.is_empty() {
                    diesel::insert_into(notifications::table)
                        .values(&notification_rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }
}

fn write_task(tx: &mut PgConnection, write: &TaskWrite) -> MarketplaceRepositoryResult<()> {
    match write {
        TaskWrite::Insert(task) => {
            diesel::insert_into(tasks::table)
                .values(&to_task_row(task))
                .execute(tx)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        MarketplaceRepositoryError::DuplicateTask(task.id())
                    } else {
                        MarketplaceRepositoryError::persistence(err)
                    }
                })?;
        }
        TaskWrite::Transition { task, expected } => {
            let task_id = task.id().into_inner();
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id))
                    .filter(tasks::status.eq(expected.as_str())),
            )
            .set(&to_status_changeset(task))
            .execute(tx)?;
            if affected == 0 {
                let exists = diesel::select(diesel::dsl::exists(tasks::table.find(task_id)))
                    .get_result::<bool>(tx)?;
                return Err(if exists {
                    MarketplaceRepositoryError::StaleTask {
                        task_id: task.id(),
                        expected: *expected,
                    }
                } else {
                    MarketplaceRepositoryError::TaskNotFound(task.id())
                });
            }
        }
    }
    Ok(())
}

fn write_application(
    tx: &mut PgConnection,
    write: &ApplicationWrite,
) -> MarketplaceRepositoryResult<()> {
    match write {
        ApplicationWrite::Insert(application) => {
            diesel::insert_into(applications::table)
                .values(&to_application_row(application))
                .execute(tx)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        MarketplaceRepositoryError::DuplicateApplication {
                            task_id: application.task_id(),
                            applicant: application.applicant(),
                        }
                    } else {
                        MarketplaceRepositoryError::persistence(err)
                    }
                })?;
        }
        ApplicationWrite::Update(application) => {
            let affected =
                diesel::update(applications::table.find(application.id().into_inner()))
                    .set((
                        applications::status.eq(application.status().as_str()),
                        applications::message.eq(application.message()),
                    ))
                    .execute(tx)?;
            if affected == 0 {
                return Err(MarketplaceRepositoryError::ApplicationNotFound(
                    application.id(),
                ));
            }
        }
    }
    Ok(())
}

fn insert_review(tx: &mut PgConnection, review: &Review) -> MarketplaceRepositoryResult<()> {
    diesel::insert_into(reviews::table)
        .values(&to_review_row(review))
        .execute(tx)
        .map_err(|err| {
            if is_unique_violation(&err) {
                MarketplaceRepositoryError::duplicate_review(review.direction())
            } else {
                MarketplaceRepositoryError::persistence(err)
            }
        })?;
    Ok(())
}

#[async_trait]
impl TaskRepository for PostgresMarketplace {
    async fn find_by_id(&self, id: TaskId) -> MarketplaceRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn find_by_id_and_status(
        &self,
        id: TaskId,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::status.eq(status.as_str()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn find_by_status_newest_first(
        &self,
        status: TaskStatusKind,
    ) -> MarketplaceRepositoryResult<Vec<Task>> {
        self.run(move |connection| {
            tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl ApplicationRepository for PostgresMarketplace {
    async fn find_by_task_and_applicant(
        &self,
        task_id: TaskId,
        applicant: UserId,
    ) -> MarketplaceRepositoryResult<Option<Application>> {
        self.run(move |connection| {
            applications::table
                .filter(applications::task_id.eq(task_id.into_inner()))
                .filter(applications::applicant_id.eq(applicant.into_inner()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()?
                .map(row_to_application)
                .transpose()
        })
        .await
    }

    async fn list_for_task(
        &self,
        task_id: TaskId,
    ) -> MarketplaceRepositoryResult<Vec<Application>> {
        self.run(move |connection| {
            applications::table
                .filter(applications::task_id.eq(task_id.into_inner()))
                .order(applications::created_at.asc())
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?
                .into_iter()
                .map(row_to_application)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl ReviewRepository for PostgresMarketplace {
    async fn exists_for_direction(
        &self,
        direction: &ReviewDirection,
    ) -> MarketplaceRepositoryResult<bool> {
        let key = *direction;
        self.run(move |connection| {
            Ok(diesel::select(diesel::dsl::exists(
                reviews::table
                    .filter(reviews::task_id.eq(key.task_id.into_inner()))
                    .filter(reviews::reviewer_id.eq(key.reviewer.into_inner()))
                    .filter(reviews::reviewee_id.eq(key.reviewee.into_inner())),
            ))
            .get_result::<bool>(connection)?)
        })
        .await
    }

    async fn find_by_task_id(&self, task_id: TaskId) -> MarketplaceRepositoryResult<Vec<Review>> {
        self.run(move |connection| {
            reviews::table
                .filter(reviews::task_id.eq(task_id.into_inner()))
                .order(reviews::created_at.asc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)?
                .into_iter()
                .map(row_to_review)
                .collect()
        })
        .await
    }

    async fn find_by_reviewee_id(
        &self,
        reviewee: UserId,
    ) -> MarketplaceRepositoryResult<Vec<Review>> {
        self.run(move |connection| {
            reviews::table
                .filter(reviews::reviewee_id.eq(reviewee.into_inner()))
                .order(reviews::created_at.asc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)?
                .into_iter()
                .map(row_to_review)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl NotificationRepository for PostgresMarketplace {
    async fn find_by_recipient(
        &self,
        recipient: UserId,
    ) -> MarketplaceRepositoryResult<Vec<Notification>> {
        self.run(move |connection| {
            let rows = notifications::table
                .filter(notifications::recipient_id.eq(recipient.into_inner()))
                .order((notifications::created_at.desc(), notifications::id.desc()))
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)?;
            Ok(rows.into_iter().map(row_to_notification).collect())
        })
        .await
    }
}

fn to_task_row(task: &Task) -> TaskRow {
    let status = task.status();
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        category: task.category().as_str().to_owned(),
        budget_cents: task.budget().minor_units(),
        address: task.address().to_owned(),
        requirements: task.requirements().map(str::to_owned),
        poster_id: task.poster().into_inner(),
        status: status.kind().as_str().to_owned(),
        assignee_id: status.assignee().map(UserId::into_inner),
        completed_at: status.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_status_changeset(task: &Task) -> TaskStatusChangeset {
    let status = task.status();
    TaskStatusChangeset {
        status: status.kind().as_str().to_owned(),
        assignee_id: status.assignee().map(UserId::into_inner),
        completed_at: status.completed_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> MarketplaceRepositoryResult<Task> {
    let id = TaskId::from_uuid(row.id);
    let category =
        TaskCategory::try_from(row.category.as_str()).map_err(MarketplaceRepositoryError::persistence)?;
    let kind =
        TaskStatusKind::try_from(row.status.as_str()).map_err(MarketplaceRepositoryError::persistence)?;
    let status = TaskStatus::from_columns(
        id,
        kind,
        row.assignee_id.map(UserId::from_uuid),
        row.completed_at,
    )
    .map_err(MarketplaceRepositoryError::persistence)?;
    let budget =
        Budget::from_minor_units(row.budget_cents).map_err(MarketplaceRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        title: row.title,
        description: row.description,
        category,
        budget,
        address: row.address,
        requirements: row.requirements,
        poster: UserId::from_uuid(row.poster_id),
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_application_row(application: &Application) -> ApplicationRow {
    ApplicationRow {
        id: application.id().into_inner(),
        task_id: application.task_id().into_inner(),
        applicant_id: application.applicant().into_inner(),
        message: application.message().map(str::to_owned),
        status: application.status().as_str().to_owned(),
        created_at: application.created_at(),
    }
}

fn row_to_application(row: ApplicationRow) -> MarketplaceRepositoryResult<Application> {
    let status = ApplicationStatus::try_from(row.status.as_str())
        .map_err(MarketplaceRepositoryError::persistence)?;
    Ok(Application::from_persisted(PersistedApplicationData {
        id: ApplicationId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        applicant: UserId::from_uuid(row.applicant_id),
        message: row.message,
        status,
        created_at: row.created_at,
    }))
}

fn to_review_row(review: &Review) -> ReviewRow {
    ReviewRow {
        id: review.id().into_inner(),
        task_id: review.task_id().into_inner(),
        reviewer_id: review.reviewer().into_inner(),
        reviewee_id: review.reviewee().into_inner(),
        rating: i16::from(review.rating().value()),
        comment: review.comment().map(str::to_owned),
        created_at: review.created_at(),
    }
}

fn row_to_review(row: ReviewRow) -> MarketplaceRepositoryResult<Review> {
    let rating =
        Rating::new(i64::from(row.rating)).map_err(MarketplaceRepositoryError::persistence)?;
    Ok(Review::from_persisted(PersistedReviewData {
        id: ReviewId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        reviewer: UserId::from_uuid(row.reviewer_id),
        reviewee: UserId::from_uuid(row.reviewee_id),
        rating,
        comment: row.comment,
        created_at: row.created_at,
    }))
}

fn to_notification_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: notification.id().into_inner(),
        recipient_id: notification.recipient().into_inner(),
        title: notification.title().to_owned(),
        message: notification.message().to_owned(),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification::from_persisted(
        NotificationId::from_uuid(row.id),
        UserId::from_uuid(row.recipient_id),
        row.title,
        row.message,
        row.created_at,
    )
}
