//! Follow edge persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `follows` table.
//! The (follower, followed) pair carries a UNIQUE constraint mirroring
//! the application-level idempotency of the follow operation.

use chrono::{DateTime, Utc};
use litrevu_core::Follow;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new follow edge.
pub async fn insert(pool: &PgPool, edge: &Follow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO follows (id, follower_id, followed_id, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(edge.id)
    .bind(edge.follower)
    .bind(edge.followed)
    .bind(edge.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a follow edge.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all follow edges from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Follow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FollowRow>(
        "SELECT id, follower_id, followed_id, created_at FROM follows ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FollowRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct FollowRow {
    id: Uuid,
    follower_id: Uuid,
    followed_id: Uuid,
    created_at: DateTime<Utc>,
}

impl FollowRow {
    fn into_record(self) -> Follow {
        Follow {
            id: self.id,
            follower: self.follower_id,
            followed: self.followed_id,
            created_at: self.created_at,
        }
    }
}
