//! Racing lifecycle calls against one task.

use super::helpers::{HELPER, Neighbourhood, POSTER, RIVAL, neighbourhood};
use eyre::ensure;
use neighborly::error::ErrorKind;
use neighborly::marketplace::domain::{Application, ApplicationStatus, TaskStatusKind};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_assignments_have_one_winner(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let task = neighbourhood.post_task("Move boxes").await?;
    services.applications.apply(task.id(), HELPER, None).await?;
    services.applications.apply(task.id(), RIVAL, None).await?;
    let task_id = task.id();

    let handles: Vec<_> = [HELPER, RIVAL]
        .into_iter()
        .map(|applicant| {
            let tasks = services.tasks.clone();
            tokio::spawn(async move { tasks.assign(task_id, applicant, POSTER).await })
        })
        .collect();
    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await?);
    }

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    ensure!(winners == 1, "exactly one assignment succeeds");
    let loser = outcomes
        .iter()
        .find_map(|outcome| outcome.as_ref().err())
        .ok_or_else(|| eyre::eyre!("expected one failed assignment"))?;
    ensure!(loser.kind() == ErrorKind::InvalidState, "unexpected: {loser:?}");

    let stored = services.tasks.get_task(task.id()).await?;
    ensure!(stored.status().kind() == TaskStatusKind::Assigned, "assigned");
    let accepted: Vec<_> = services
        .applications
        .list_applications(task.id(), POSTER)
        .await?
        .into_iter()
        .filter(|application| application.status() == ApplicationStatus::Accepted)
        .collect();
    ensure!(accepted.len() == 1, "exactly one application accepted");
    ensure!(
        accepted.first().map(Application::applicant) == stored.assignee(),
        "the accepted applicant is the assignee"
    );
    ensure!(
        neighbourhood.marketplace.all_notifications().len() == 3,
        "two application notifications and one assignment"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_have_one_winner(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let task_id = neighbourhood.assigned_task("Trim hedge").await?.id();

    let handles: Vec<_> = [HELPER, POSTER]
        .into_iter()
        .map(|actor| {
            let tasks = neighbourhood.services.tasks.clone();
            tokio::spawn(async move { tasks.complete(task_id, actor).await })
        })
        .collect();
    let mut successes = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => successes += 1,
            Err(err) => ensure!(err.kind() == ErrorKind::InvalidState, "unexpected: {err:?}"),
        }
    }

    ensure!(successes == 1, "exactly one completion succeeds");
    let completions = neighbourhood
        .marketplace
        .all_notifications()
        .iter()
        .filter(|notice| notice.title() == "Task completed!")
        .count();
    ensure!(completions == 2, "completion notifications staged once");
    Ok(())
}
