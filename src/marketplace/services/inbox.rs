//! Read side of in-app notifications.

use super::{LifecycleResult, lookup};
use crate::identity::ports::UserRepository;
use crate::marketplace::{domain::Notification, ports::MarketplaceRepository};
use std::sync::Arc;

/// Lists the notifications addressed to a user.
#[derive(Clone)]
pub struct NotificationInbox<M, U>
where
    M: MarketplaceRepository,
    U: UserRepository,
{
    marketplace: Arc<M>,
    users: Arc<U>,
}

impl<M, U> NotificationInbox<M, U>
where
    M: MarketplaceRepository,
    U: UserRepository,
{
    /// Creates a new inbox reader.
    #[must_use]
    pub const fn new(marketplace: Arc<M>, users: Arc<U>) -> Self {
        Self { marketplace, users }
    }

    /// Returns the user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::LifecycleError::NotFound`] for an unknown user or a
    /// repository error.
    pub async fn notifications_for(&self, email: &str) -> LifecycleResult<Vec<Notification>> {
        let user = lookup::user_by_email(&*self.users, email).await?;
        Ok(self.marketplace.find_by_recipient(user.id()).await?)
    }
}
