//! Ticket persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tickets` table.
//! Deleting a ticket cascades to its reviews via the schema's foreign key
//! (`ON DELETE CASCADE`); callers mirror that in the in-memory stores.

use chrono::{DateTime, Utc};
use litrevu_core::Ticket;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new ticket.
pub async fn insert(pool: &PgPool, ticket: &Ticket) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tickets (id, owner_id, title, description, image, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(ticket.id)
    .bind(ticket.owner)
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(&ticket.image)
    .bind(ticket.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a ticket's editable fields.
pub async fn update(pool: &PgPool, ticket: &Ticket) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE tickets SET title = $1, description = $2, image = $3 WHERE id = $4",
    )
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(&ticket.image)
    .bind(ticket.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a ticket. Its reviews go with it via the foreign key cascade.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all tickets from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TicketRow>(
        "SELECT id, owner_id, title, description, image, created_at
         FROM tickets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(TicketRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl TicketRow {
    fn into_record(self) -> Ticket {
        Ticket {
            id: self.id,
            owner: self.owner_id,
            title: self.title,
            description: self.description,
            image: self.image,
            created_at: self.created_at,
        }
    }
}
