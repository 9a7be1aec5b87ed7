//! Review eligibility and submission.

use super::{Denial, Duplicate, LifecycleError, LifecycleResult, lookup};
use crate::identity::ports::UserRepository;
use crate::marketplace::{
    domain::{Rating, Review, ReviewDirection, TaskId, TaskStatusKind, guard},
    ports::{MarketplaceRepository, UnitOfWork},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Review submission parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReviewRequest {
    task_id: TaskId,
    reviewer_email: String,
    reviewee_email: String,
    rating: i64,
    comment: Option<String>,
}

impl SubmitReviewRequest {
    /// Creates a request without a comment.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        reviewer_email: impl Into<String>,
        reviewee_email: impl Into<String>,
        rating: i64,
    ) -> Self {
        Self {
            task_id,
            reviewer_email: reviewer_email.into(),
            reviewee_email: reviewee_email.into(),
            rating,
            comment: None,
        }
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Gatekeeper for reviews between the parties of completed tasks.
#[derive(Clone)]
pub struct ReviewGate<M, U, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    marketplace: Arc<M>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<M, U, C> ReviewGate<M, U, C>
where
    M: MarketplaceRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new review gate.
    #[must_use]
    pub const fn new(marketplace: Arc<M>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            marketplace,
            users,
            clock,
        }
    }

    /// Stores a review after checking eligibility.
    ///
    /// The task status is checked before the rating, so reviews of open or
    /// assigned tasks always fail with [`LifecycleError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown task or user,
    /// [`LifecycleError::InvalidState`] unless the task is completed,
    /// [`LifecycleError::InvalidArgument`] for a rating outside `1..=5`,
    /// [`LifecycleError::Unauthorized`] unless both users are parties to the
    /// task, [`LifecycleError::Conflict`] for a repeated review, or a
    /// repository error.
    pub async fn submit_review(&self, request: SubmitReviewRequest) -> LifecycleResult<Review> {
        let task = lookup::task_by_id(&*self.marketplace, request.task_id).await?;
        task.require(TaskStatusKind::Completed)?;
        let rating = Rating::new(request.rating)?;

        let reviewer = lookup::user_by_email(&*self.users, &request.reviewer_email).await?;
        let reviewee = lookup::user_by_email(&*self.users, &request.reviewee_email).await?;
        if !(guard::is_involved(reviewer.id(), &task) && guard::is_involved(reviewee.id(), &task)) {
            return Err(LifecycleError::Unauthorized(Denial::ReviewPartiesNotInvolved));
        }

        let direction = ReviewDirection {
            task_id: task.id(),
            reviewer: reviewer.id(),
            reviewee: reviewee.id(),
        };
        if self.marketplace.exists_for_direction(&direction).await? {
            return Err(LifecycleError::Conflict(Duplicate::Review));
        }

        let review = Review::write(direction, rating, request.comment, &*self.clock);
        let mut work = UnitOfWork::new();
        work.insert_review(review.clone());
        self.marketplace.commit(work).await?;
        info!(
            task_id = %task.id(),
            reviewer_id = %reviewer.id(),
            reviewee_id = %reviewee.id(),
            rating = rating.value(),
            "review submitted"
        );
        Ok(review)
    }

    /// Returns every review of a task, in either direction.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn reviews_for_task(&self, task_id: TaskId) -> LifecycleResult<Vec<Review>> {
        Ok(self.marketplace.find_by_task_id(task_id).await?)
    }

    /// Returns every review received by the user owning `email`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] for an unknown user or a
    /// repository error.
    pub async fn reviews_for_user(&self, email: &str) -> LifecycleResult<Vec<Review>> {
        let user = lookup::user_by_email(&*self.users, email).await?;
        Ok(self.marketplace.find_by_reviewee_id(user.id()).await?)
    }
}
