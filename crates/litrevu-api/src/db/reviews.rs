//! Review persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `reviews` table.
//! The compound create shares one transaction with the ticket insert so
//! a failure persists neither row.

use chrono::{DateTime, Utc};
use litrevu_core::{Rating, Review, Ticket};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new review.
pub async fn insert(pool: &PgPool, review: &Review) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO reviews (id, owner_id, ticket_id, rating, headline, body, image, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(review.id)
    .bind(review.owner)
    .bind(review.ticket)
    .bind(i16::from(review.rating.value()))
    .bind(&review.headline)
    .bind(&review.body)
    .bind(&review.image)
    .bind(review.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a ticket and its review in a single transaction.
pub async fn insert_with_ticket(
    pool: &PgPool,
    ticket: &Ticket,
    review: &Review,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

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
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO reviews (id, owner_id, ticket_id, rating, headline, body, image, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(review.id)
    .bind(review.owner)
    .bind(review.ticket)
    .bind(i16::from(review.rating.value()))
    .bind(&review.headline)
    .bind(&review.body)
    .bind(&review.image)
    .bind(review.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}

/// Update a review's editable fields.
pub async fn update(pool: &PgPool, review: &Review) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE reviews SET rating = $1, headline = $2, body = $3, image = $4 WHERE id = $5",
    )
    .bind(i16::from(review.rating.value()))
    .bind(&review.headline)
    .bind(&review.body)
    .bind(&review.image)
    .bind(review.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a review.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all reviews from the database into the in-memory store on startup.
///
/// Rows with out-of-range ratings are skipped and logged at ERROR.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, owner_id, ticket_id, rating, headline, body, image, created_at
         FROM reviews ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(ReviewRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    owner_id: Uuid,
    ticket_id: Uuid,
    rating: i16,
    headline: String,
    body: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_record(self) -> Option<Review> {
        let rating = u8::try_from(self.rating)
            .ok()
            .and_then(|r| Rating::new(r).ok());
        let rating = match rating {
            Some(rating) => rating,
            None => {
                tracing::error!(
                    id = %self.id,
                    rating = self.rating,
                    "out-of-range rating in database — skipping row; investigate"
                );
                return None;
            }
        };

        Some(Review {
            id: self.id,
            owner: self.owner_id,
            ticket: self.ticket_id,
            rating,
            headline: self.headline,
            body: self.body,
            image: self.image,
            created_at: self.created_at,
        })
    }
}
