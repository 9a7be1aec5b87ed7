//! Registration and verification through the wired services.

use super::helpers::{HELPER, Neighbourhood, POSTER, neighbourhood};
use eyre::{OptionExt, ensure};
use neighborly::error::ErrorKind;
use neighborly::identity::{domain::EmailAddress, services::RegisterUserRequest};
use rstest::rstest;

fn verification_token(neighbourhood: &Neighbourhood, address: &str) -> eyre::Result<String> {
    let recipient = EmailAddress::new(address)?;
    let email = neighbourhood
        .mailer
        .delivered_to(&recipient)
        .into_iter()
        .find(|email| email.subject().starts_with("Verify"))
        .ok_or_eyre("verification email delivered")?;
    let token = email
        .body()
        .split_whitespace()
        .find_map(|word| word.split_once("token=").map(|(_, value)| value.to_owned()))
        .ok_or_eyre("verification link carries a token")?;
    Ok(token)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_user_verifies_with_emailed_token(
    neighbourhood: Neighbourhood,
) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let accounts = &neighbourhood.services.accounts;
    ensure!(
        !accounts.read(POSTER).await?.is_email_verified(),
        "new accounts start unverified"
    );

    let token = verification_token(&neighbourhood, POSTER)?;
    let verified = accounts.verify_email(&token).await?;
    ensure!(verified.is_email_verified(), "token redemption verifies");

    let reuse = accounts
        .verify_email(&token)
        .await
        .expect_err("tokens are single use");
    ensure!(reuse.kind() == ErrorKind::InvalidArgument, "unexpected: {reuse:?}");
    ensure!(
        !accounts.read(HELPER).await?.is_email_verified(),
        "other accounts unaffected"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_registration_conflicts(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let err = neighbourhood
        .services
        .accounts
        .register(RegisterUserRequest::new("Other", "Person", HELPER))
        .await
        .expect_err("email already taken");

    ensure!(err.kind() == ErrorKind::Conflict, "unexpected: {err:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unverified_users_may_still_post(neighbourhood: Neighbourhood) -> eyre::Result<()> {
    neighbourhood.register_residents().await?;
    let task = neighbourhood.post_task("Garden tidy").await?;
    let poster = neighbourhood.services.accounts.read(POSTER).await?;

    ensure!(task.poster() == poster.id(), "task belongs to the poster");
    Ok(())
}
