//! Email failures never change lifecycle outcomes; notification failures do.

use super::helpers::{HELPER, Neighbourhood, POSTER, neighbourhood};
use eyre::ensure;
use neighborly::error::ErrorKind;
use neighborly::identity::domain::EmailAddress;
use neighborly::marketplace::{domain::TaskStatusKind, services::SubmitReviewRequest};
use rstest::rstest;

fn silence(neighbourhood: &Neighbourhood, addresses: &[&str]) -> eyre::Result<()> {
    for address in addresses {
        neighbourhood.mailer.fail_for(EmailAddress::new(*address)?);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_mail_leaves_the_scenario_intact(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    silence(&neighbourhood, &[POSTER, HELPER])?;
    let services = &neighbourhood.services;
    let attempts_before = neighbourhood.mailer.attempts();

    let task = neighbourhood.post_task("Clean gutters").await?;
    services.applications.apply(task.id(), HELPER, None).await?;
    services.tasks.assign(task.id(), HELPER, POSTER).await?;
    let completed = services.tasks.complete(task.id(), HELPER).await?;
    services
        .reviews
        .submit_review(SubmitReviewRequest::new(task.id(), HELPER, POSTER, 4))
        .await?;

    ensure!(completed.status().kind() == TaskStatusKind::Completed, "completed");
    ensure!(
        neighbourhood.marketplace.all_notifications().len() == 6,
        "every notification committed"
    );
    ensure!(
        neighbourhood.mailer.attempts() - attempts_before == 4,
        "application, assignment and two completion emails attempted"
    );
    ensure!(
        neighbourhood.emails_starting_with("Task Completed") == 0,
        "no completion email delivered"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_failed_completion_email_does_not_block_the_other(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let task = neighbourhood.assigned_task("Fold laundry").await?;
    silence(&neighbourhood, &[POSTER])?;

    neighbourhood.services.tasks.complete(task.id(), POSTER).await?;

    let helper = EmailAddress::new(HELPER)?;
    let delivered = neighbourhood.mailer.delivered_to(&helper);
    ensure!(
        delivered
            .iter()
            .any(|email| email.body().contains("80% of the task fee")),
        "helper still receives the payout email"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_notification_write_rolls_back_apply(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let task = neighbourhood.post_task("Collect groceries").await?;
    neighbourhood.marketplace.reject_notification_writes();
    let attempts_before = neighbourhood.mailer.attempts();

    let err = services
        .applications
        .apply(task.id(), HELPER, None)
        .await
        .expect_err("notification write fails");

    ensure!(err.kind() == ErrorKind::Infrastructure, "unexpected: {err:?}");
    ensure!(
        services
            .applications
            .list_applications(task.id(), POSTER)
            .await?
            .is_empty(),
        "application rolled back"
    );
    ensure!(
        neighbourhood.mailer.attempts() == attempts_before,
        "no email for an uncommitted change"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_notification_write_rolls_back_completion(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let task = neighbourhood.assigned_task("Service bicycle").await?;
    neighbourhood.marketplace.reject_notification_writes();

    let err = neighbourhood
        .services
        .tasks
        .complete(task.id(), HELPER)
        .await
        .expect_err("notification write fails");

    ensure!(err.kind() == ErrorKind::Infrastructure, "unexpected: {err:?}");
    let stored = neighbourhood.services.tasks.get_task(task.id()).await?;
    ensure!(stored.status().kind() == TaskStatusKind::Assigned, "still assigned");
    ensure!(stored.completed_at().is_none(), "no completion time");
    Ok(())
}
