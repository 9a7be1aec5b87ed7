//! Application services for accounts.

mod account;

pub use account::{
    AccountError, AccountResult, AccountService, DEFAULT_TOKEN_TTL_HOURS, RegisterUserRequest,
    VerificationPolicy,
};
