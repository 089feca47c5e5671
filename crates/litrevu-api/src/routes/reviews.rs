//! # Reviews
//!
//! ## Endpoints
//!
//! - `POST /tickets/:id/reviews` — review an existing ticket
//! - `PUT /reviews/:id` — edit a review (owner only)
//! - `DELETE /reviews/:id` — delete a review (owner only)
//! - `POST /reviews` — compound create: a ticket and its review in one
//!   request, for reviewing a work nobody has asked about yet
//!
//! The compound create is atomic: both drafts validate before either
//! record is persisted, and the database writes share one transaction.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::redirect_to_posts;
use crate::state::AppState;
use litrevu_core::{authorize, Review, ReviewDraft, Ticket, TicketDraft};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to create a ticket and its review in one step.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompoundReviewRequest {
    /// The ticket describing the work under review.
    #[schema(value_type = Object)]
    pub ticket: TicketDraft,
    /// The review itself.
    #[schema(value_type = Object)]
    pub review: ReviewDraft,
}

impl Validate for CompoundReviewRequest {
    fn validate(&self) -> Result<(), String> {
        TicketDraft::validate(&self.ticket).map_err(|e| e.to_string())?;
        ReviewDraft::validate(&self.review).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Response to a successful compound create.
#[derive(Debug, Serialize)]
pub struct CompoundReviewResponse {
    pub ticket: Ticket,
    pub review: Review,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets/:id/reviews", post(create_review))
        .route("/reviews", post(create_compound))
        .route(
            "/reviews/:id",
            axum::routing::put(update_review).delete(delete_review),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /tickets/:id/reviews — Review an existing ticket.
#[utoipa::path(
    post,
    path = "/tickets/{id}/reviews",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = Object,
    responses(
        (status = 201, description = "Review created", body = Object),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    body: Result<Json<ReviewDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let draft = extract_validated_json(body)?;

    if !state.tickets.contains(&ticket_id) {
        return Err(AppError::NotFound(format!("ticket {ticket_id} not found")));
    }

    let review = draft.create(user.id, ticket_id, Utc::now())?;

    if let Some(pool) = &state.db_pool {
        crate::db::reviews::insert(pool, &review).await?;
    }
    state.reviews.insert(review.id, review.clone());
    tracing::info!(review = %review.id, ticket = %ticket_id, owner = %user.id, "review created");

    Ok((StatusCode::CREATED, Json(review)))
}

/// POST /reviews — Create a ticket and its review atomically.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CompoundReviewRequest,
    responses(
        (status = 201, description = "Ticket and review created", body = Object),
        (status = 422, description = "Validation error; nothing was created", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub(crate) async fn create_compound(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<CompoundReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompoundReviewResponse>), AppError> {
    // Both drafts validate before either record exists.
    let req = extract_validated_json(body)?;

    let now = Utc::now();
    let ticket = req.ticket.create(user.id, now)?;
    let review = req.review.create(user.id, ticket.id, now)?;

    if let Some(pool) = &state.db_pool {
        crate::db::reviews::insert_with_ticket(pool, &ticket, &review).await?;
    }
    state.tickets.insert(ticket.id, ticket.clone());
    state.reviews.insert(review.id, review.clone());
    tracing::info!(ticket = %ticket.id, review = %review.id, owner = %user.id, "compound create");

    Ok((
        StatusCode::CREATED,
        Json(CompoundReviewResponse { ticket, review }),
    ))
}

/// PUT /reviews/:id — Edit a review. Owner only.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Review updated", body = Object),
        (status = 303, description = "Not the owner; redirected to /posts"),
        (status = 404, description = "Review not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub(crate) async fn update_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Result<Json<ReviewDraft>, JsonRejection>,
) -> Result<Response, AppError> {
    let draft = extract_validated_json(body)?;

    let mut review = state
        .reviews
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;

    if let Err(denied) = authorize(user.id, &review) {
        tracing::warn!(%denied, "review edit denied");
        return Ok(redirect_to_posts());
    }

    draft.apply(&mut review)?;

    if let Some(pool) = &state.db_pool {
        crate::db::reviews::update(pool, &review).await?;
    }
    state.reviews.insert(id, review.clone());
    tracing::info!(review = %id, "review updated");

    Ok(Json(review).into_response())
}

/// DELETE /reviews/:id — Delete a review. Owner only.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 303, description = "Not the owner; redirected to /posts"),
        (status = 404, description = "Review not found", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub(crate) async fn delete_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let review = state
        .reviews
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("review {id} not found")))?;

    if let Err(denied) = authorize(user.id, &review) {
        tracing::warn!(%denied, "review delete denied");
        return Ok(redirect_to_posts());
    }

    if let Some(pool) = &state.db_pool {
        crate::db::reviews::delete(pool, id).await?;
    }
    state.reviews.remove(&id);
    tracing::info!(review = %id, "review deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_request_rejects_bad_review_before_anything_persists() {
        let req = CompoundReviewRequest {
            ticket: TicketDraft {
                title: "Dune".to_string(),
                description: String::new(),
                image: None,
            },
            review: ReviewDraft {
                rating: 7,
                headline: "Too much sand".to_string(),
                body: "But a good read.".to_string(),
                image: None,
            },
        };
        let err = req.validate().unwrap_err();
        assert!(err.contains('7'), "got: {err}");
    }

    #[test]
    fn compound_request_rejects_bad_ticket() {
        let req = CompoundReviewRequest {
            ticket: TicketDraft {
                title: "   ".to_string(),
                description: String::new(),
                image: None,
            },
            review: ReviewDraft {
                rating: 4,
                headline: "Fine".to_string(),
                body: "Fine indeed.".to_string(),
                image: None,
            },
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn compound_request_accepts_valid_pair() {
        let req = CompoundReviewRequest {
            ticket: TicketDraft {
                title: "Dune".to_string(),
                description: "Herbert, 1965".to_string(),
                image: None,
            },
            review: ReviewDraft {
                rating: 5,
                headline: "A classic".to_string(),
                body: "Spice and politics.".to_string(),
                image: None,
            },
        };
        assert!(req.validate().is_ok());
    }
}
