//! `PostgreSQL` repository implementation for the identity store.

use super::{
    models::{NewUserRow, TokenRow, UserRow},
    schema::{email_verification_tokens, users},
};
use crate::identity::{
    domain::{
        EmailAddress, EmailVerificationToken, PersistedUserData, PhoneNumber, Role, TokenValue,
        User, UserId, VerificationTokenId,
    },
    ports::{
        IdentityRepositoryError, IdentityRepositoryResult, UserRepository,
        VerificationTokenRepository,
    },
};
use crate::postgres::{PgPool, run_blocking};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user and verification token repository.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, operation: F) -> IdentityRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IdentityRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            operation,
            IdentityRepositoryError::persistence,
            IdentityRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for IdentityRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn insert_user(
    tx: &mut PgConnection,
    row: &NewUserRow,
    email: &EmailAddress,
) -> IdentityRepositoryResult<()> {
    diesel::insert_into(users::table)
        .values(row)
        .execute(tx)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                IdentityRepositoryError::DuplicateEmail(email.clone())
            }
            _ => IdentityRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn update_user(tx: &mut PgConnection, changes: &UserChanges) -> IdentityRepositoryResult<()> {
    let affected = diesel::update(users::table.find(changes.user_id.into_inner()))
        .set((
            users::bio.eq(changes.bio.as_deref()),
            users::phone.eq(changes.phone.as_deref()),
            users::email_verified.eq(changes.email_verified),
            users::updated_at.eq(changes.updated_at),
        ))
        .execute(tx)?;
    if affected == 0 {
        return Err(IdentityRepositoryError::UserNotFound(changes.user_id));
    }
    Ok(())
}

/// Mutable user columns captured for a blocking update.
struct UserChanges {
    user_id: UserId,
    bio: Option<String>,
    phone: Option<String>,
    email_verified: bool,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserChanges {
    fn of(user: &User) -> Self {
        Self {
            user_id: user.id(),
            bio: user.bio().map(str::to_owned),
            phone: user.phone().map(|phone| phone.as_str().to_owned()),
            email_verified: user.is_email_verified(),
            updated_at: user.updated_at(),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresIdentityStore {
    async fn store(&self, user: &User) -> IdentityRepositoryResult<()> {
        let email = user.email().clone();
        let row = to_new_row(user);
        self.run(move |connection| insert_user(connection, &row, &email)).await
    }

    async fn update(&self, user: &User) -> IdentityRepositoryResult<()> {
        let changes = UserChanges::of(user);
        self.run(move |connection| update_user(connection, &changes)).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run(move |connection| {
            users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?
                .map(row_to_user)
                .transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> IdentityRepositoryResult<Option<User>> {
        self.run(move |connection| {
            users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?
                .map(row_to_user)
                .transpose()
        })
        .await
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> IdentityRepositoryResult<bool> {
        let lookup = email.as_str().to_owned();
        self.run(move |connection| {
            diesel::select(diesel::dsl::exists(
                users::table.filter(users::email.eq(lookup)),
            ))
            .get_result::<bool>(connection)
            .map_err(IdentityRepositoryError::persistence)
        })
        .await
    }
}

#[async_trait]
impl VerificationTokenRepository for PostgresIdentityStore {
    async fn register_with_token(
        &self,
        user: &User,
        token: &EmailVerificationToken,
    ) -> IdentityRepositoryResult<()> {
        let email = user.email().clone();
        let user_row = to_new_row(user);
        let token_row = TokenRow {
            id: token.id().into_inner(),
            user_id: token.user_id().into_inner(),
            token: token.value().as_str().to_owned(),
            expires_at: token.expires_at(),
        };
        self.run(move |connection| {
            connection.transaction::<_, IdentityRepositoryError, _>(|tx| {
                insert_user(tx, &user_row, &email)?;
                diesel::insert_into(email_verification_tokens::table)
                    .values(&token_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_value(
        &self,
        value: &TokenValue,
    ) -> IdentityRepositoryResult<Option<EmailVerificationToken>> {
        let lookup = value.as_str().to_owned();
        self.run(move |connection| {
            let row = email_verification_tokens::table
                .filter(email_verification_tokens::token.eq(lookup))
                .select(TokenRow::as_select())
                .first::<TokenRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            Ok(row.map(row_to_token))
        })
        .await
    }

    async fn consume(&self, id: VerificationTokenId) -> IdentityRepositoryResult<bool> {
        self.run(move |connection| {
            let deleted = diesel::delete(email_verification_tokens::table.find(id.into_inner()))
                .execute(connection)
                .map_err(IdentityRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn redeem(
        &self,
        id: VerificationTokenId,
        owner: &User,
    ) -> IdentityRepositoryResult<bool> {
        let changes = UserChanges::of(owner);
        self.run(move |connection| {
            connection.transaction::<_, IdentityRepositoryError, _>(|tx| {
                let deleted =
                    diesel::delete(email_verification_tokens::table.find(id.into_inner()))
                        .execute(tx)?;
                if deleted == 0 {
                    return Ok(false);
                }
                update_user(tx, &changes)?;
                Ok(true)
            })
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().to_owned(),
        role: user.role().as_str().to_owned(),
        bio: user.bio().map(str::to_owned),
        phone: user.phone().map(|phone| phone.as_str().to_owned()),
        email_verified: user.is_email_verified(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> IdentityRepositoryResult<User> {
    let email = EmailAddress::new(row.email).map_err(IdentityRepositoryError::persistence)?;
    let role = Role::try_from(row.role.as_str()).map_err(IdentityRepositoryError::persistence)?;
    let phone = row
        .phone
        .map(PhoneNumber::new)
        .transpose()
        .map_err(IdentityRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        email,
        first_name: row.first_name,
        last_name: row.last_name,
        role,
        bio: row.bio,
        phone,
        email_verified: row.email_verified,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_token(row: TokenRow) -> EmailVerificationToken {
    EmailVerificationToken::from_persisted(
        VerificationTokenId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        TokenValue::from_raw(row.token),
        row.expires_at,
    )
}
