//! Port contracts for marketplace persistence.

mod repository;
mod store;

pub use repository::{
    ApplicationRepository, MarketplaceRepository, MarketplaceRepositoryError,
    MarketplaceRepositoryResult, NotificationRepository, ReviewRepository, TaskRepository,
};
pub use store::{ApplicationWrite, MarketplaceStore, TaskWrite, UnitOfWork};
