//! # Postgres Persistence
//!
//! Optional durable mirror of the in-memory stores. One module per table
//! (`users`, `tickets`, `reviews`, `follows`), each exposing the write
//! operations the routes need plus `load_all` for startup hydration.
//! `schema.sql` at the repository root documents the tables.
//!
//! Reads are served from memory after hydration; the pool is only touched
//! on mutations.

pub mod follows;
pub mod reviews;
pub mod tickets;
pub mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Initialize the database pool from `DATABASE_URL`.
///
/// Returns `Ok(None)` when the variable is unset — the API then runs in
/// in-memory-only mode. A set but unreachable URL is an error: silently
/// dropping persistence would be worse than failing to start.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::info!("DATABASE_URL not set; running without persistence");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    tracing::info!("database pool initialized");
    Ok(Some(pool))
}
