//! Email dispatch services.

mod dispatch;

pub use dispatch::{DeliveryOutcome, EmailDispatcher};
