//! Given steps for marketplace lifecycle BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use neighborly::identity::services::RegisterUserRequest;
use neighborly::marketplace::{domain::TaskCategory, services::PostTaskRequest};
use rstest_bdd_macros::given;

const RESIDENTS: [(&str, &str, &str); 3] = [
    ("Precious", "Dlamini", "precious@example.test"),
    ("Sipho", "Ndlovu", "sipho@example.test"),
    ("Karabo", "Molefe", "karabo@example.test"),
];

#[given("the residents are registered")]
fn residents_registered(world: &mut MarketplaceWorld) -> Result<(), eyre::Report> {
    for (first, last, email) in RESIDENTS {
        run_async(
            world
                .services
                .accounts
                .register(RegisterUserRequest::new(first, last, email)),
        )
        .wrap_err_with(|| format!("register {email}"))?;
    }
    Ok(())
}

#[given(r#""{email}" posted a task "{title}" with budget "{budget}""#)]
fn task_posted(
    world: &mut MarketplaceWorld,
    email: String,
    title: String,
    budget: String,
) -> Result<(), eyre::Report> {
    let request = PostTaskRequest::new(
        title,
        "Scenario task",
        TaskCategory::Errands,
        budget,
        "3 Church Street",
    );
    let task = run_async(world.services.tasks.create(request, &email))
        .wrap_err("post task for scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#""{email}" applied to the task"#)]
fn applied_to_task(world: &mut MarketplaceWorld, email: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    run_async(world.services.applications.apply(task_id, &email, None))
        .wrap_err("apply in scenario setup")?;
    Ok(())
}

#[given(r#"the task has been assigned to "{applicant}" by "{poster}""#)]
fn task_assigned(
    world: &mut MarketplaceWorld,
    applicant: String,
    poster: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let task = run_async(world.services.tasks.assign(task_id, &applicant, &poster))
        .wrap_err("assign in scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"the task has been completed by "{email}""#)]
fn task_completed(world: &mut MarketplaceWorld, email: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let task = run_async(world.services.tasks.complete(task_id, &email))
        .wrap_err("complete in scenario setup")?;
    world.task = Some(task);
    Ok(())
}
