//! Wiring of adapters and services from [`Settings`].

use crate::config::{MailSettings, Settings, VerificationSettings};
use crate::identity::{
    adapters::{memory::InMemoryIdentityStore, postgres::PostgresIdentityStore},
    ports::{UserRepository, VerificationTokenRepository},
    services::{AccountService, VerificationPolicy},
};
use crate::mailer::{
    adapters::{HttpRelayConfig, HttpRelayMailer, LogMailer},
    domain::OutgoingEmail,
    ports::{EmailDeliveryError, EmailDeliveryResult, EmailSender},
};
use crate::marketplace::{
    adapters::{memory::InMemoryMarketplace, postgres::PostgresMarketplace},
    ports::MarketplaceRepository,
    services::{
        ApplicationLifecycleService, NotificationInbox, ReviewGate, TaskLifecycleService,
    },
};
use crate::postgres::build_pool;
use async_trait::async_trait;
use diesel::r2d2::PoolError;
use mockable::{Clock, DefaultClock};
use reqwest::Url;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors raised while wiring the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// `database.url` is required for `PostgreSQL` wiring.
    #[error("database.url is not configured")]
    MissingDatabaseUrl,

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// `mail.relay_url` is not a valid URL.
    #[error("invalid mail relay URL {url}: {reason}")]
    InvalidRelayUrl {
        /// Configured value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The relay mailer could not be built.
    #[error("failed to build relay mailer: {0}")]
    Mailer(#[from] EmailDeliveryError),
}

/// Mailer chosen from [`MailSettings`].
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    /// Delivers through the configured HTTP relay.
    Relay(HttpRelayMailer),
    /// Logs emails; used when no relay is configured.
    Log(LogMailer),
}

impl ConfiguredMailer {
    /// Selects the relay mailer when `relay_url` is set, the log mailer
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRelayUrl`] or [`AppError::Mailer`] when the
    /// relay cannot be configured.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, AppError> {
        let Some(relay_url) = settings.relay_url.as_deref() else {
            return Ok(Self::Log(LogMailer));
        };
        let endpoint = Url::parse(relay_url).map_err(|err| AppError::InvalidRelayUrl {
            url: relay_url.to_owned(),
            reason: err.to_string(),
        })?;
        let mailer = HttpRelayMailer::new(HttpRelayConfig {
            endpoint,
            from_address: settings.from_address.clone(),
            api_key: settings.api_key.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })?;
        Ok(Self::Relay(mailer))
    }
}

#[async_trait]
impl EmailSender for ConfiguredMailer {
    async fn send(&self, email: &OutgoingEmail) -> EmailDeliveryResult<()> {
        match self {
            Self::Relay(mailer) => mailer.send(email).await,
            Self::Log(mailer) => mailer.send(email).await,
        }
    }
}

/// Every Neighborly service sharing one set of adapters.
pub struct Neighborly<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository + VerificationTokenRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    /// Registration, verification and profiles.
    pub accounts: AccountService<U, E, C>,
    /// Posting, assignment and completion.
    pub tasks: TaskLifecycleService<M, U, E, C>,
    /// Applying to tasks.
    pub applications: ApplicationLifecycleService<M, U, E, C>,
    /// Review submission and queries.
    pub reviews: ReviewGate<M, U, C>,
    /// In-app notification queries.
    pub inbox: NotificationInbox<M, U>,
}

impl<M, U, E, C> Neighborly<M, U, E, C>
where
    M: MarketplaceRepository,
    U: UserRepository + VerificationTokenRepository,
    E: EmailSender,
    C: Clock + Send + Sync,
{
    /// Builds every service over the given adapters.
    #[must_use]
    pub fn new(
        marketplace: Arc<M>,
        users: Arc<U>,
        mailer: Arc<E>,
        clock: Arc<C>,
        verification: &VerificationSettings,
    ) -> Self {
        let policy = VerificationPolicy {
            token_ttl: chrono::Duration::hours(i64::from(verification.token_ttl_hours)),
            link_base: verification.link_base.clone(),
        };
        Self {
            accounts: AccountService::new(
                Arc::clone(&users),
                Arc::clone(&mailer),
                Arc::clone(&clock),
            )
            .with_policy(policy),
            tasks: TaskLifecycleService::new(
                Arc::clone(&marketplace),
                Arc::clone(&users),
                Arc::clone(&mailer),
                Arc::clone(&clock),
            ),
            applications: ApplicationLifecycleService::new(
                Arc::clone(&marketplace),
                Arc::clone(&users),
                mailer,
                Arc::clone(&clock),
            ),
            reviews: ReviewGate::new(Arc::clone(&marketplace), Arc::clone(&users), clock),
            inbox: NotificationInbox::new(marketplace, users),
        }
    }
}

/// Services backed by `PostgreSQL`.
pub type PostgresNeighborly =
    Neighborly<PostgresMarketplace, PostgresIdentityStore, ConfiguredMailer, DefaultClock>;

/// Services backed by in-memory stores.
pub type InMemoryNeighborly =
    Neighborly<InMemoryMarketplace, InMemoryIdentityStore, ConfiguredMailer, DefaultClock>;

/// Wires `PostgreSQL` adapters and the configured mailer.
///
/// # Errors
///
/// Returns [`AppError`] when the database URL is missing, the pool cannot be
/// built, or the mailer is misconfigured.
pub fn connect(settings: &Settings) -> Result<PostgresNeighborly, AppError> {
    let url = settings
        .database
        .url
        .as_ref()
        .ok_or(AppError::MissingDatabaseUrl)?;
    let pool = build_pool(url.expose_secret(), settings.database.max_connections)?;
    let mailer = ConfiguredMailer::from_settings(&settings.mail)?;
    info!(
        max_connections = settings.database.max_connections,
        relay = matches!(mailer, ConfiguredMailer::Relay(_)),
        "wired PostgreSQL adapters"
    );
    Ok(Neighborly::new(
        Arc::new(PostgresMarketplace::new(pool.clone())),
        Arc::new(PostgresIdentityStore::new(pool)),
        Arc::new(mailer),
        Arc::new(DefaultClock),
        &settings.verification,
    ))
}

/// Wires in-memory adapters and the configured mailer.
///
/// # Errors
///
/// Returns [`AppError`] when the mailer is misconfigured.
pub fn in_memory(settings: &Settings) -> Result<InMemoryNeighborly, AppError> {
    let mailer = ConfiguredMailer::from_settings(&settings.mail)?;
    Ok(Neighborly::new(
        Arc::new(InMemoryMarketplace::new()),
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(mailer),
        Arc::new(DefaultClock),
        &settings.verification,
    ))
}
