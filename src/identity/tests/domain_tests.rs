//! Unit tests for identity value types and the user aggregate.

use super::FixedClock;
use crate::identity::domain::{
    EmailAddress, EmailVerificationToken, IdentityDomainError, NewUser, PhoneNumber, Role, User,
    UserId,
};
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::new()
}

fn registered(clock: &FixedClock) -> User {
    let email = EmailAddress::new("thandi@example.test").expect("valid email");
    let new_user = NewUser::new(email, "Thandi", "Nkosi").expect("valid names");
    User::register(new_user, clock)
}

#[rstest]
#[case("thandi@example.test")]
#[case("Mixed.Case@Example.test")]
fn email_address_accepts_well_formed_values(#[case] raw: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_str(), raw);
}

#[rstest]
#[case("")]
#[case("no-at-sign")]
#[case("@example.test")]
#[case("thandi@")]
#[case("two@@example.test")]
#[case("with space@example.test")]
#[case(" leading@example.test")]
#[case("trailing@example.test\n")]
#[case("  padded@example.test  ")]
fn email_address_rejects_malformed_values(#[case] raw: &str) {
    assert!(matches!(
        EmailAddress::new(raw),
        Err(IdentityDomainError::InvalidEmail(_))
    ));
}

#[rstest]
fn email_matching_is_case_sensitive() {
    let lower = EmailAddress::new("sipho@example.test").expect("valid email");
    let upper = EmailAddress::new("Sipho@example.test").expect("valid email");
    assert_ne!(lower, upper);
}

#[rstest]
#[case("+27821234567", true)]
#[case(" +27821234567 ", true)]
#[case("0821234567", false)]
#[case("+2782123456", false)]
#[case("+278212345678", false)]
#[case("+27 82123456", false)]
fn phone_number_requires_country_code_and_nine_digits(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(PhoneNumber::new(raw).is_ok(), valid);
}

#[rstest]
#[case(" ", "Nkosi", "first name")]
#[case("Thandi", "", "last name")]
fn new_user_rejects_blank_names(
    #[case] first: &str,
    #[case] last: &str,
    #[case] field: &'static str,
) {
    let email = EmailAddress::new("thandi@example.test").expect("valid email");
    assert_eq!(
        NewUser::new(email, first, last),
        Err(IdentityDomainError::EmptyName(field))
    );
}

#[rstest]
fn register_creates_unverified_regular_user(clock: FixedClock) {
    let user = registered(&clock);

    assert_eq!(user.role(), Role::User);
    assert!(!user.is_email_verified());
    assert_eq!(user.full_name(), "Thandi Nkosi");
    assert_eq!(user.created_at(), clock.utc());
    assert_eq!(user.bio(), None);
}

#[rstest]
fn mark_email_verified_sets_flag_and_touches_timestamp(clock: FixedClock) {
    let mut user = registered(&clock);
    clock.advance(Duration::minutes(5));

    user.mark_email_verified(&clock);

    assert!(user.is_email_verified());
    assert_eq!(user.updated_at(), clock.utc());
    assert!(user.updated_at() > user.created_at());
}

#[rstest]
fn update_profile_clears_blank_bio(clock: FixedClock) {
    let mut user = registered(&clock);
    let phone = PhoneNumber::new("+27821234567").expect("valid phone");

    user.update_profile(Some("Handy with tools".to_owned()), Some(phone.clone()), &clock);
    assert_eq!(user.bio(), Some("Handy with tools"));
    assert_eq!(user.phone(), Some(&phone));

    user.update_profile(Some("   ".to_owned()), None, &clock);
    assert_eq!(user.bio(), None);
    assert_eq!(user.phone(), None);
}

#[rstest]
#[case("user", Role::User)]
#[case("ADMIN", Role::Admin)]
fn role_parses_storage_labels(#[case] label: &str, #[case] expected: Role) {
    assert_eq!(Role::try_from(label), Ok(expected));
}

#[rstest]
fn token_expires_strictly_after_its_deadline(clock: FixedClock) {
    let token = EmailVerificationToken::issue(UserId::new(), Duration::hours(24), &clock);

    assert!(!token.is_expired_at(token.expires_at()));
    assert!(token.is_expired_at(token.expires_at() + Duration::seconds(1)));
}

#[rstest]
fn issued_tokens_are_unique(clock: FixedClock) {
    let user_id = UserId::new();
    let first = EmailVerificationToken::issue(user_id, Duration::hours(1), &clock);
    let second = EmailVerificationToken::issue(user_id, Duration::hours(1), &clock);

    assert_ne!(first.value(), second.value());
}
