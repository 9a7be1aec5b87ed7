//! Adapter implementations for the email delivery port.

pub mod http;
pub mod log;
pub mod memory;

pub use http::{HttpRelayConfig, HttpRelayMailer};
pub use log::LogMailer;
pub use memory::InMemoryMailer;
