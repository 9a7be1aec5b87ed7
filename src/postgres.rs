//! Shared `PostgreSQL` plumbing for Diesel-backed adapters.
//!
//! Diesel connections are synchronous; every adapter offloads its work to
//! the blocking thread pool through [`run_blocking`] so the async executor's
//! worker threads never wait on the database.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be established.
pub fn build_pool(database_url: &str, max_connections: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_connections).build(manager)
}

/// Runs `operation` with a pooled connection on the blocking thread pool.
///
/// Pool checkout failures and task join failures are mapped into the
/// caller's error type through `map_pool` and `map_join`.
pub(crate) async fn run_blocking<F, T, E>(
    pool: &PgPool,
    operation: F,
    map_pool: fn(PoolError) -> E,
    map_join: fn(tokio::task::JoinError) -> E,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(map_pool)?;
        operation(&mut connection)
    })
    .await
    .map_err(map_join)?
}
