//! Behaviour tests for the marketplace task lifecycle.

#[path = "marketplace_lifecycle_steps/mod.rs"]
mod marketplace_lifecycle_steps_defs;

use marketplace_lifecycle_steps_defs::world::{MarketplaceWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "Assign and complete a task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn assign_and_complete(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "Reject a budget below the minimum"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_low_budget(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "Poster cannot apply to their own task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_self_application(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "Review each party once"
)]
#[tokio::test(flavor = "multi_thread")]
async fn review_each_party_once(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "A bystander cannot complete a task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn bystander_cannot_complete(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/marketplace_lifecycle.feature",
    name = "Reviews wait for completion"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_wait_for_completion(world: MarketplaceWorld) {
    let _ = world;
}
