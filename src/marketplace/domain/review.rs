//! Reviews left between the two parties of a completed task.

use super::{MarketplaceDomainError, ReviewId, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceDomainError::RatingOutOfRange`] outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, MarketplaceDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (Self::MIN..=Self::MAX).contains(stars))
            .map(Self)
            .ok_or(MarketplaceDomainError::RatingOutOfRange(value))
    }

    /// Returns the number of stars.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = MarketplaceDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        Self::from(value.0)
    }
}

/// One party's review of the other for a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    task_id: TaskId,
    reviewer: UserId,
    reviewee: UserId,
    rating: Rating,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted review identifier.
    pub id: ReviewId,
    /// Reviewed task.
    pub task_id: TaskId,
    /// Author of the review.
    pub reviewer: UserId,
    /// Subject of the review.
    pub reviewee: UserId,
    /// Persisted rating.
    pub rating: Rating,
    /// Persisted comment, if any.
    pub comment: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Who reviews whom for which task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewDirection {
    /// Reviewed task.
    pub task_id: TaskId,
    /// Author of the review.
    pub reviewer: UserId,
    /// Subject of the review.
    pub reviewee: UserId,
}

impl Review {
    /// Creates a review. A blank comment is dropped.
    #[must_use]
    pub fn write(
        direction: ReviewDirection,
        rating: Rating,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            task_id: direction.task_id,
            reviewer: direction.reviewer,
            reviewee: direction.reviewee,
            rating,
            comment: comment
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            reviewer: data.reviewer,
            reviewee: data.reviewee,
            rating: data.rating,
            comment: data.comment,
            created_at: data.created_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewed task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn reviewer(&self) -> UserId {
        self.reviewer
    }

    /// Returns the subject.
    #[must_use]
    pub const fn reviewee(&self) -> UserId {
        self.reviewee
    }

    /// Returns the review's task, reviewer and reviewee.
    #[must_use]
    pub const fn direction(&self) -> ReviewDirection {
        ReviewDirection {
            task_id: self.task_id,
            reviewer: self.reviewer,
            reviewee: self.reviewee,
        }
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
