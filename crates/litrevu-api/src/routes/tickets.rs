//! # Tickets — Review Requests
//!
//! ## Endpoints
//!
//! - `POST /tickets` — create a ticket
//! - `GET /tickets/:id` — fetch a ticket
//! - `PUT /tickets/:id` — edit (owner only)
//! - `DELETE /tickets/:id` — delete (owner only), cascading its reviews
//!
//! Edit and delete pass the ownership guard; a non-owner receives the
//! silent redirect to `/posts` from `routes::redirect_to_posts`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::routes::redirect_to_posts;
use crate::state::AppState;
use litrevu_core::{authorize, Ticket, TicketDraft};

/// Build the tickets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(create_ticket))
        .route(
            "/tickets/:id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /tickets — Create a ticket requesting a review.
#[utoipa::path(
    post,
    path = "/tickets",
    request_body = Object,
    responses(
        (status = 201, description = "Ticket created", body = Object),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tickets"
)]
pub(crate) async fn create_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<TicketDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let draft = extract_validated_json(body)?;
    let ticket = draft.create(user.id, Utc::now())?;

    if let Some(pool) = &state.db_pool {
        crate::db::tickets::insert(pool, &ticket).await?;
    }
    state.tickets.insert(ticket.id, ticket.clone());
    tracing::info!(ticket = %ticket.id, owner = %user.id, "ticket created");

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets/:id — Fetch a single ticket.
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket found", body = Object),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tickets"
)]
pub(crate) async fn get_ticket(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    state
        .tickets
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ticket {id} not found")))
}

/// PUT /tickets/:id — Edit a ticket. Owner only.
#[utoipa::path(
    put,
    path = "/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Ticket updated", body = Object),
        (status = 303, description = "Not the owner; redirected to /posts"),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tickets"
)]
pub(crate) async fn update_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Result<Json<TicketDraft>, JsonRejection>,
) -> Result<Response, AppError> {
    let draft = extract_validated_json(body)?;

    let mut ticket = state
        .tickets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {id} not found")))?;

    if let Err(denied) = authorize(user.id, &ticket) {
        tracing::warn!(%denied, "ticket edit denied");
        return Ok(redirect_to_posts());
    }

    draft.apply(&mut ticket)?;

    if let Some(pool) = &state.db_pool {
        crate::db::tickets::update(pool, &ticket).await?;
    }
    state.tickets.insert(id, ticket.clone());
    tracing::info!(ticket = %id, "ticket updated");

    Ok(Json(ticket).into_response())
}

/// DELETE /tickets/:id — Delete a ticket and its reviews. Owner only.
#[utoipa::path(
    delete,
    path = "/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 204, description = "Ticket and its reviews deleted"),
        (status = 303, description = "Not the owner; redirected to /posts"),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tickets"
)]
pub(crate) async fn delete_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = state
        .tickets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {id} not found")))?;

    if let Err(denied) = authorize(user.id, &ticket) {
        tracing::warn!(%denied, "ticket delete denied");
        return Ok(redirect_to_posts());
    }

    // The reviews table cascades on ticket deletion; the in-memory
    // stores mirror that here.
    if let Some(pool) = &state.db_pool {
        crate::db::tickets::delete(pool, id).await?;
    }
    let removed_reviews = state.reviews.remove_where(|r| r.ticket == id);
    state.tickets.remove(&id);
    tracing::info!(
        ticket = %id,
        cascaded_reviews = removed_reviews.len(),
        "ticket deleted"
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}
