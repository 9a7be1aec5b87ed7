//! Structured logging initialisation.

use crate::config::TelemetrySettings;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry, filter::ParseError, fmt, layer::SubscriberExt,
    util::SubscriberInitExt, util::TryInitError,
};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive is invalid.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("logging already initialised: {0}")]
    AlreadyInitialised(#[from] TryInitError),
}

/// Builds the event filter: `RUST_LOG` when set and valid, otherwise the
/// configured level.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured level does
/// not parse.
pub fn env_filter(settings: &TelemetrySettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(TelemetryError::from)
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] for an invalid filter or when a subscriber is
/// already installed.
pub fn init(settings: &TelemetrySettings) -> Result<(), TelemetryError> {
    let registry = Registry::default().with(env_filter(settings)?);
    if settings.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }
    Ok(())
}
