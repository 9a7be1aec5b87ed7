//! End-to-end marketplace flows over in-memory adapters.

use super::helpers::{BYSTANDER, HELPER, Neighbourhood, POSTER, RIVAL, neighbourhood};
use eyre::{OptionExt, ensure};
use neighborly::error::ErrorKind;
use neighborly::marketplace::{
    domain::{ApplicationStatus, Task, TaskStatusKind},
    services::SubmitReviewRequest,
};
use rstest::rstest;

fn assignee_matches_status(task: &Task) -> bool {
    match task.status().kind() {
        TaskStatusKind::Open => task.assignee().is_none(),
        TaskStatusKind::Assigned | TaskStatusKind::Completed => task.assignee().is_some(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn post_apply_assign_complete_review(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let poster = services.accounts.read(POSTER).await?;
    let helper = services.accounts.read(HELPER).await?;

    let task = neighbourhood.post_task("Spring clean").await?;
    ensure!(task.status().kind() == TaskStatusKind::Open, "new task is open");
    ensure!(task.budget().to_string() == "50.00", "budget kept exactly");
    ensure!(assignee_matches_status(&task), "open task has no assignee");

    let application = services
        .applications
        .apply(task.id(), HELPER, Some("I can do Saturday".to_owned()))
        .await?;
    ensure!(application.status() == ApplicationStatus::Pending, "pending");
    ensure!(
        services.inbox.notifications_for(POSTER).await?.len() == 1,
        "poster notified of application"
    );

    let assigned = services.tasks.assign(task.id(), HELPER, POSTER).await?;
    ensure!(assigned.assignee() == Some(helper.id()), "helper assigned");
    ensure!(assignee_matches_status(&assigned), "assigned task has assignee");
    let applications = services
        .applications
        .list_applications(task.id(), POSTER)
        .await?;
    let accepted = applications.first().ok_or_eyre("application listed")?;
    ensure!(accepted.status() == ApplicationStatus::Accepted, "accepted");
    ensure!(
        services.inbox.notifications_for(HELPER).await?.len() == 1,
        "helper notified of assignment"
    );

    let completed = services.tasks.complete(task.id(), HELPER).await?;
    ensure!(completed.status().kind() == TaskStatusKind::Completed, "done");
    ensure!(completed.completed_at().is_some(), "completion time recorded");
    ensure!(assignee_matches_status(&completed), "completed task keeps assignee");
    ensure!(
        neighbourhood.marketplace.all_notifications().len() == 6,
        "one application, one assignment, four completion notifications"
    );

    let review = services
        .reviews
        .submit_review(SubmitReviewRequest::new(task.id(), POSTER, HELPER, 5).with_comment("great"))
        .await?;
    ensure!(review.reviewer() == poster.id(), "poster wrote the review");
    let repeat = services
        .reviews
        .submit_review(SubmitReviewRequest::new(task.id(), POSTER, HELPER, 4).with_comment("again"))
        .await
        .expect_err("second review rejected");
    ensure!(repeat.kind() == ErrorKind::Conflict, "unexpected: {repeat:?}");
    ensure!(
        services.reviews.reviews_for_task(task.id()).await?.len() == 1,
        "exactly one review persists"
    );
    ensure!(
        services.reviews.reviews_for_user(HELPER).await?.len() == 1,
        "helper has one review"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_emails_follow_each_commit(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    ensure!(
        neighbourhood.emails_starting_with("Verify your Neighborly Gigs account") == 4,
        "each resident receives a verification email"
    );

    let task = neighbourhood.assigned_task("Paint the fence").await?;
    neighbourhood.services.tasks.complete(task.id(), POSTER).await?;

    ensure!(
        neighbourhood.emails_starting_with("New Application for Your Task") == 1,
        "poster emailed about the application"
    );
    ensure!(
        neighbourhood.emails_starting_with("You've Been Assigned") == 1,
        "helper emailed about the assignment"
    );
    ensure!(
        neighbourhood.emails_starting_with("Task Completed: Paint the fence") == 2,
        "both parties emailed on completion"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn applications_are_unique_per_applicant(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let task = neighbourhood.post_task("Wash windows").await?;

    services.applications.apply(task.id(), HELPER, None).await?;
    services.applications.apply(task.id(), RIVAL, None).await?;
    let repeat = services
        .applications
        .apply(task.id(), HELPER, None)
        .await
        .expect_err("second application rejected");

    ensure!(repeat.kind() == ErrorKind::Conflict, "unexpected: {repeat:?}");
    let applications = services
        .applications
        .list_applications(task.id(), POSTER)
        .await?;
    ensure!(applications.len() == 2, "one application per applicant");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_leaves_other_applications_pending(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let task = neighbourhood.post_task("Fix gate").await?;
    services.applications.apply(task.id(), RIVAL, None).await?;
    services.applications.apply(task.id(), HELPER, None).await?;

    services.tasks.assign(task.id(), HELPER, POSTER).await?;

    let rival = services.accounts.read(RIVAL).await?;
    let applications = services
        .applications
        .list_applications(task.id(), POSTER)
        .await?;
    let rival_application = applications
        .iter()
        .find(|application| application.applicant() == rival.id())
        .ok_or_eyre("rival application listed")?;
    ensure!(
        rival_application.status() == ApplicationStatus::Pending,
        "only the chosen application is accepted"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_complete_or_review(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let services = &neighbourhood.services;
    let task = neighbourhood.assigned_task("Clean pool").await?;

    let complete = services
        .tasks
        .complete(task.id(), BYSTANDER)
        .await
        .expect_err("bystander cannot complete");
    ensure!(complete.kind() == ErrorKind::Unauthorized, "unexpected: {complete:?}");
    let unchanged = services.tasks.get_task(task.id()).await?;
    ensure!(unchanged == task, "task left untouched");

    services.tasks.complete(task.id(), HELPER).await?;
    let review = services
        .reviews
        .submit_review(SubmitReviewRequest::new(task.id(), BYSTANDER, HELPER, 1))
        .await
        .expect_err("bystander cannot review");
    ensure!(review.kind() == ErrorKind::Unauthorized, "unexpected: {review:?}");
    Ok(())
}

#[rstest]
#[case(TaskStatusKind::Open)]
#[case(TaskStatusKind::Assigned)]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_wait_for_completion(
    neighbourhood: Neighbourhood,
    #[case] status: TaskStatusKind,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let task = match status {
        TaskStatusKind::Open => neighbourhood.post_task("Sweep yard").await?,
        TaskStatusKind::Assigned | TaskStatusKind::Completed => {
            neighbourhood.assigned_task("Sweep yard").await?
        }
    };

    for rating in [0, 3, 7] {
        let err = neighbourhood
            .services
            .reviews
            .submit_review(SubmitReviewRequest::new(task.id(), POSTER, HELPER, rating))
            .await
            .expect_err("review before completion rejected");
        ensure!(
            err.kind() == ErrorKind::InvalidState,
            "rating {rating} on {status} task: {err:?}"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_tasks_are_listed_newest_first(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let first = neighbourhood.post_task("First").await?;
    let second = neighbourhood.post_task("Second").await?;
    let third = neighbourhood.post_task("Third").await?;
    neighbourhood
        .services
        .applications
        .apply(second.id(), HELPER, None)
        .await?;
    neighbourhood
        .services
        .tasks
        .assign(second.id(), HELPER, POSTER)
        .await?;

    let open = neighbourhood.services.tasks.list_open_tasks().await?;
    let ids: Vec<_> = open.iter().map(Task::id).collect();
    ensure!(ids == [third.id(), first.id()], "newest open tasks first");
    Ok(())
}
