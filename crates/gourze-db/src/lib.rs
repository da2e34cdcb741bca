//! # Gourze DB
//!
//! Database pool setup, write-error mapping, and the translation of a parsed
//! [`ListQuery`](gourze_core::ListQuery) into parameterized SQL.
//!
//! # Example
//!
//! ```ignore
//! use gourze_db::{init_db_pool, query};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//!
//! let total: i64 = query::count("users", &list_query)
//!     .build_query_scalar()
//!     .fetch_one(&pool)
//!     .await?;
//! ```

pub mod query;

use std::time::Duration;

use gourze_core::{AppError, ListQuery};
use sqlx::FromRow;
use sqlx::postgres::{PgPoolOptions, PgRow};
use tracing::{debug, info};

pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool.
///
/// Called once at startup. The returned pool is cheaply cloneable and lives
/// in the application state for the lifetime of the process.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// True when `err` is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when `err` is a Postgres foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Runs the count and page queries of a list request.
///
/// Returns the current page and the total number of matching rows.
pub async fn fetch_page<T>(
    db: &PgPool,
    table: &str,
    columns: &str,
    list: &ListQuery,
) -> Result<(Vec<T>, i64), sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = query::count(table, list);
    let total: i64 = count.build_query_scalar().fetch_one(db).await?;

    let mut page = query::page(&format!("SELECT {columns} FROM {table}"), list);
    debug!(sql = page.sql(), "List query");
    let items = page.build_query_as::<T>().fetch_all(db).await?;

    Ok((items, total))
}

/// Maps a failed INSERT/UPDATE: unique violations become 409 with
/// `conflict_msg`, dangling references become 400, anything else 500.
pub fn map_write_error(err: sqlx::Error, conflict_msg: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow::anyhow!("{}", conflict_msg))
    } else if is_foreign_key_violation(&err) {
        AppError::bad_request(anyhow::anyhow!("Referenced record does not exist"))
    } else {
        AppError::internal(err)
    }
}
