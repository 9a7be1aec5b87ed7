//! Outbound email for Neighborly.
//!
//! Email is a best-effort side channel: lifecycle operations hand notices to
//! the [`services::EmailDispatcher`], which renders and delivers them and
//! swallows every failure after logging it. The module follows hexagonal
//! architecture:
//!
//! - Email envelopes and notice copy in [`domain`]
//! - The delivery contract in [`ports`]
//! - Delivery adapters in [`adapters`]
//! - The dispatcher in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
