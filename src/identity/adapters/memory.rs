//! In-memory identity store for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::{
    domain::{EmailAddress, EmailVerificationToken, TokenValue, User, UserId, VerificationTokenId},
    ports::{
        IdentityRepositoryError, IdentityRepositoryResult, UserRepository,
        VerificationTokenRepository,
    },
};

/// Thread-safe in-memory user and token repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    state: Arc<RwLock<IdentityState>>,
}

#[derive(Debug, Default)]
struct IdentityState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
    tokens: HashMap<VerificationTokenId, EmailVerificationToken>,
    reject_token_writes: bool,
    reject_user_updates: bool,
}

impl IdentityState {
    fn check_user_update(&self, user: &User) -> IdentityRepositoryResult<()> {
        if !self.users.contains_key(&user.id()) {
            return Err(IdentityRepositoryError::UserNotFound(user.id()));
        }
        if self.reject_user_updates {
            return Err(rejected("user update rejected"));
        }
        Ok(())
    }
}

fn rejected(message: &'static str) -> IdentityRepositoryError {
    IdentityRepositoryError::persistence(std::io::Error::other(message))
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later token insert fail, for exercising rollback.
    pub fn reject_token_writes(&self) {
        if let Ok(mut state) = self.state.write() {
            state.reject_token_writes = true;
        }
    }

    /// Makes every later user update fail, for exercising rollback.
    pub fn reject_user_updates(&self) {
        if let Ok(mut state) = self.state.write() {
            state.reject_user_updates = true;
        }
    }

    fn read(&self) -> IdentityRepositoryResult<RwLockReadGuard<'_, IdentityState>> {
        self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IdentityRepositoryResult<RwLockWriteGuard<'_, IdentityState>> {
        self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryIdentityStore {
    async fn store(&self, user: &User) -> IdentityRepositoryResult<()> {
        let mut state = self.write()?;
        if state.email_index.contains_key(user.email()) {
            return Err(IdentityRepositoryError::DuplicateEmail(user.email().clone()));
        }
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> IdentityRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_user_update(user)?;
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> IdentityRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<bool> {
        Ok(self.read()?.email_index.contains_key(email))
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryIdentityStore {
    async fn register_with_token(
        &self,
        user: &User,
        token: &EmailVerificationToken,
    ) -> IdentityRepositoryResult<()> {
        let mut state = self.write()?;
        if state.email_index.contains_key(user.email()) {
            return Err(IdentityRepositoryError::DuplicateEmail(user.email().clone()));
        }
        if state.reject_token_writes {
            return Err(rejected("token insert rejected"));
        }
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        state.tokens.insert(token.id(), token.clone());
        Ok(())
    }

    async fn find_by_value(
        &self,
        value: &TokenValue,
    ) -> IdentityRepositoryResult<Option<EmailVerificationToken>> {
        let state = self.read()?;
        Ok(state
            .tokens
            .values()
            .find(|token| token.value() == value)
            .cloned())
    }

    async fn consume(&self, id: VerificationTokenId) -> IdentityRepositoryResult<bool> {
        Ok(self.write()?.tokens.remove(&id).is_some())
    }

    async fn redeem(
        &self,
        id: VerificationTokenId,
        owner: &User,
    ) -> IdentityRepositoryResult<bool> {
        let mut state = self.write()?;
        if !state.tokens.contains_key(&id) {
            return Ok(false);
        }
        state.check_user_update(owner)?;
        state.tokens.remove(&id);
        state.users.insert(owner.id(), owner.clone());
        Ok(true)
    }
}
