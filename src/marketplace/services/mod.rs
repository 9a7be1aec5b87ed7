//! Application services for the marketplace.

mod application_lifecycle;
mod emails;
mod error;
mod inbox;
mod lookup;
mod notifications;
mod review_gate;
mod task_lifecycle;

pub use application_lifecycle::ApplicationLifecycleService;
pub use emails::LifecycleEmails;
pub use error::{Denial, Duplicate, LifecycleError, LifecycleResult, MissingEntity};
pub use inbox::NotificationInbox;
pub use notifications::NotificationDispatcher;
pub use review_gate::{ReviewGate, SubmitReviewRequest};
pub use task_lifecycle::{PostTaskRequest, TaskLifecycleService};
