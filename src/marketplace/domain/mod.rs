//! Domain model for the task marketplace.
//!
//! Tasks move `open -> assigned -> completed` and never back. Applications
//! move `pending -> accepted` only as part of assigning their task. Reviews
//! and notifications are append-only. Infrastructure stays outside this
//! module.

mod application;
mod budget;
mod error;
pub mod guard;
mod ids;
mod notification;
mod review;
mod task;

pub use application::{Application, ApplicationStatus, PersistedApplicationData};
pub use budget::Budget;
pub use error::{MarketplaceDomainError, ParseLabelError, TaskTransitionError};
pub use ids::{ApplicationId, NotificationId, ReviewId, TaskId};
pub use notification::{Notification, NotificationContent};
pub use review::{PersistedReviewData, Rating, Review, ReviewDirection};
pub use task::{NewTask, PersistedTaskData, Task, TaskCategory, TaskStatus, TaskStatusKind};
