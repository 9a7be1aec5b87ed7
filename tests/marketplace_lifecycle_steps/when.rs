//! When steps for marketplace lifecycle BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use neighborly::marketplace::{
    domain::TaskCategory,
    services::{PostTaskRequest, SubmitReviewRequest},
};
use rstest_bdd_macros::when;

#[when(r#""{email}" posts a task "{title}" with budget "{budget}""#)]
fn post_task(world: &mut MarketplaceWorld, email: String, title: String, budget: String) {
    let request = PostTaskRequest::new(
        title,
        "Scenario task",
        TaskCategory::Errands,
        budget,
        "3 Church Street",
    );
    let result = run_async(world.services.tasks.create(request, &email));
    world.record(result);
}

#[when(r#""{email}" applies to the task"#)]
fn apply_to_task(world: &mut MarketplaceWorld, email: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.services.applications.apply(task_id, &email, None));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#""{poster}" assigns the task to "{applicant}""#)]
fn assign_task(
    world: &mut MarketplaceWorld,
    poster: String,
    applicant: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.services.tasks.assign(task_id, &applicant, &poster));
    world.record(result);
    Ok(())
}

#[when(r#""{email}" completes the task"#)]
fn complete_task(world: &mut MarketplaceWorld, email: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.services.tasks.complete(task_id, &email));
    world.record(result);
    Ok(())
}

#[when(r#""{reviewer}" reviews "{reviewee}" with rating {rating:i64}"#)]
fn review(
    world: &mut MarketplaceWorld,
    reviewer: String,
    reviewee: String,
    rating: i64,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let request = SubmitReviewRequest::new(task_id, reviewer, reviewee, rating);
    let result = run_async(world.services.reviews.submit_review(request));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}
