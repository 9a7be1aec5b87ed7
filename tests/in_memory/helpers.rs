//! Shared fixtures for in-memory integration tests.

use neighborly::{
    app::Neighborly,
    config::VerificationSettings,
    identity::{adapters::memory::InMemoryIdentityStore, services::RegisterUserRequest},
    mailer::adapters::InMemoryMailer,
    marketplace::{
        adapters::memory::InMemoryMarketplace,
        domain::{Task, TaskCategory},
        services::PostTaskRequest,
    },
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Poster used across scenarios.
pub const POSTER: &str = "precious@example.test";
/// Applicant who gets assigned.
pub const HELPER: &str = "sipho@example.test";
/// Second applicant.
pub const RIVAL: &str = "ayanda@example.test";
/// Registered user with no part in any task.
pub const BYSTANDER: &str = "karabo@example.test";

/// Services type wired over in-memory adapters.
pub type TestNeighborly =
    Neighborly<InMemoryMarketplace, InMemoryIdentityStore, InMemoryMailer, DefaultClock>;

/// Services plus handles on the adapters behind them.
pub struct Neighbourhood {
    pub services: TestNeighborly,
    pub marketplace: Arc<InMemoryMarketplace>,
    pub mailer: InMemoryMailer,
}

/// Provides services over fresh in-memory adapters.
#[fixture]
pub fn neighbourhood() -> Neighbourhood {
    let marketplace = Arc::new(InMemoryMarketplace::new());
    let mailer = InMemoryMailer::new();
    let services = Neighborly::new(
        Arc::clone(&marketplace),
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(mailer.clone()),
        Arc::new(DefaultClock),
        &VerificationSettings::default(),
    );
    Neighbourhood {
        services,
        marketplace,
        mailer,
    }
}

impl Neighbourhood {
    /// Registers the four scenario residents.
    ///
    /// # Errors
    ///
    /// Returns an error if any registration fails.
    pub async fn register_residents(&self) -> eyre::Result<()> {
        for (first, last, email) in [
            ("Precious", "Dlamini", POSTER),
            ("Sipho", "Ndlovu", HELPER),
            ("Ayanda", "Khumalo", RIVAL),
            ("Karabo", "Molefe", BYSTANDER),
        ] {
            self.services
                .accounts
                .register(RegisterUserRequest::new(first, last, email))
                .await?;
        }
        Ok(())
    }

    /// Posts a cleaning task with a 50.00 budget as [`POSTER`].
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be posted.
    pub async fn post_task(&self, title: &str) -> eyre::Result<Task> {
        let request = PostTaskRequest::new(
            title,
            "Two bedrooms and a kitchen",
            TaskCategory::Cleaning,
            "50.00",
            "18 Vilakazi Street",
        );
        Ok(self.services.tasks.create(request, POSTER).await?)
    }

    /// Posts a task, has [`HELPER`] apply and assigns it.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub async fn assigned_task(&self, title: &str) -> eyre::Result<Task> {
        let task = self.post_task(title).await?;
        self.services
            .applications
            .apply(task.id(), HELPER, None)
            .await?;
        Ok(self.services.tasks.assign(task.id(), HELPER, POSTER).await?)
    }

    /// Returns the number of emails delivered with `subject_prefix`.
    #[must_use]
    pub fn emails_starting_with(&self, subject_prefix: &str) -> usize {
        self.mailer
            .delivered()
            .iter()
            .filter(|email| email.subject().starts_with(subject_prefix))
            .count()
    }
}
