//! Layered runtime settings.
//!
//! Values come from built-in defaults overridden by environment variables
//! prefixed with `NEIGHBORLY`, using `__` between path segments, for example
//! `NEIGHBORLY__MAIL__FROM_ADDRESS`.

use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "NEIGHBORLY";

const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or a value did not deserialize.
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),
}

/// Root settings object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Outbound email settings.
    pub mail: MailSettings,
    /// Email verification settings.
    pub verification: VerificationSettings,
    /// Logging settings.
    pub telemetry: TelemetrySettings,
}

/// `PostgreSQL` settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; in-memory adapters are used when absent.
    pub url: Option<SecretString>,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Email delivery settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// Sender address.
    pub from_address: String,
    /// Relay endpoint; emails are only logged when absent.
    pub relay_url: Option<String>,
    /// Bearer token for the relay.
    pub api_key: Option<SecretString>,
    /// Per-request relay timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            from_address: "no-reply@neighborlygigs.co.za".to_owned(),
            relay_url: None,
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Email verification settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    /// Hours a verification token stays valid.
    pub token_ttl_hours: u32,
    /// Base URL of the verification link; the token is appended as a query.
    pub link_base: String,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            token_ttl_hours: 24,
            link_base: "http://localhost:8080/verify".to_owned(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads settings from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when an environment value cannot be
    /// deserialized into its field.
    pub fn new() -> Result<Self, SettingsError> {
        let loaded = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;
        Ok(loaded.try_deserialize()?)
    }
}
