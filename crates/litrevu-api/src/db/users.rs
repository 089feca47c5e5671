//! User account persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `users` table.
//! Username uniqueness is enforced both here (UNIQUE constraint) and at
//! the application layer.

use chrono::{DateTime, Utc};
use litrevu_core::Username;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::UserRecord;

/// Insert a new user record.
pub async fn insert(pool: &PgPool, record: &UserRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password_salt, password_digest, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id)
    .bind(record.username.as_str())
    .bind(&record.password_salt)
    .bind(&record.password_digest)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all users from the database into the in-memory store on startup.
///
/// Rows with usernames that no longer pass validation are skipped and
/// logged at ERROR; dropping a corrupt row beats refusing to start.
pub async fn load_all(pool: &PgPool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_salt, password_digest, created_at
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(UserRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_salt: String,
    password_digest: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> Option<UserRecord> {
        let username = match Username::new(self.username.clone()) {
            Ok(username) => username,
            Err(e) => {
                tracing::error!(
                    id = %self.id,
                    username = %self.username,
                    error = %e,
                    "invalid username in database — skipping row; investigate"
                );
                return None;
            }
        };

        Some(UserRecord {
            id: self.id,
            username,
            password_salt: self.password_salt,
            password_digest: self.password_digest,
            created_at: self.created_at,
        })
    }
}
