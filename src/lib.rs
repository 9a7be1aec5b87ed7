//! Neighborly: lifecycle engine for a neighbourhood task marketplace.
//!
//! Residents post paid tasks, neighbours apply, the poster assigns one
//! applicant, either party marks the work complete, and both parties may
//! then review each other once. Each lifecycle change commits together with
//! the in-app notifications it promises; emails follow on a best-effort basis.
//!
//! # Architecture
//!
//! Neighborly follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail relay)
//!
//! # Modules
//!
//! - [`identity`]: Users, email verification and profiles
//! - [`marketplace`]: Tasks, applications, reviews and notifications
//! - [`mailer`]: Best-effort outbound email
//! - [`app`]: Service wiring from [`config::Settings`]

pub mod app;
pub mod config;
pub mod error;
pub mod identity;
pub mod mailer;
pub mod marketplace;
pub mod postgres;
pub mod telemetry;
