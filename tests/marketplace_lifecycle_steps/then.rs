//! Then steps for marketplace lifecycle BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use neighborly::marketplace::domain::TaskStatusKind;
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &MarketplaceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatusKind::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.services.tasks.get_task(task_id))
        .map_err(|err| eyre::eyre!("get_task failed: {err}"))?;

    if stored.status().kind() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status().kind()
        ));
    }
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails_with(world: &MarketplaceWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_error {
        Some(actual) if actual.as_str() == kind => Ok(()),
        Some(actual) => Err(eyre::eyre!("expected {kind} failure, got {actual}")),
        None => Err(eyre::eyre!("expected {kind} failure, but the operation succeeded")),
    }
}

#[then(r#""{email}" has {count:usize} notifications"#)]
fn notification_count(
    world: &MarketplaceWorld,
    email: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let notifications = run_async(world.services.inbox.notifications_for(&email))
        .map_err(|err| eyre::eyre!("notifications_for failed: {err}"))?;
    if notifications.len() != count {
        return Err(eyre::eyre!(
            "expected {count} notifications for {email}, found {}",
            notifications.len()
        ));
    }
    Ok(())
}

#[then(r#""{email}" has {count:usize} reviews"#)]
fn review_count(world: &MarketplaceWorld, email: String, count: usize) -> Result<(), eyre::Report> {
    let reviews = run_async(world.services.reviews.reviews_for_user(&email))
        .map_err(|err| eyre::eyre!("reviews_for_user failed: {err}"))?;
    if reviews.len() != count {
        return Err(eyre::eyre!(
            "expected {count} reviews for {email}, found {}",
            reviews.len()
        ));
    }
    Ok(())
}
