//! Shared world state for marketplace lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use neighborly::{
    app::Neighborly,
    config::VerificationSettings,
    error::ErrorKind,
    identity::adapters::memory::InMemoryIdentityStore,
    mailer::adapters::InMemoryMailer,
    marketplace::{
        adapters::memory::InMemoryMarketplace, domain::Task, services::LifecycleError,
    },
};
use rstest::fixture;

/// Services type used by the BDD world.
pub type TestServices =
    Neighborly<InMemoryMarketplace, InMemoryIdentityStore, InMemoryMailer, DefaultClock>;

/// Scenario world for marketplace lifecycle behaviour tests.
pub struct MarketplaceWorld {
    pub services: TestServices,
    pub task: Option<Task>,
    pub last_error: Option<ErrorKind>,
}

impl MarketplaceWorld {
    /// Creates a world over empty in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let services = Neighborly::new(
            Arc::new(InMemoryMarketplace::new()),
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryMailer::new()),
            Arc::new(DefaultClock),
            &VerificationSettings::default(),
        );
        Self {
            services,
            task: None,
            last_error: None,
        }
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been posted yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Records the outcome of a task operation the scenario expects may fail.
    pub fn record(&mut self, result: Result<Task, LifecycleError>) {
        match result {
            Ok(task) => {
                self.task = Some(task);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err.kind()),
        }
    }
}

impl Default for MarketplaceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MarketplaceWorld {
    MarketplaceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
