//! # Feed Views
//!
//! ## Endpoints
//!
//! - `GET /flux` — the aggregated feed: tickets and reviews from the
//!   requester and everyone they follow, newest first
//! - `GET /posts` — the requester's own tickets and reviews, newest first
//!
//! Aggregation, visibility, and ordering live in `litrevu_core::feed`;
//! these handlers only gather the stores and serialize the result.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::CurrentUser;
use crate::state::AppState;
use litrevu_core::{feed, own_posts, FeedEntry};

/// Build the feed router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flux", get(flux))
        .route("/posts", get(posts))
}

/// GET /flux — The aggregated feed for the authenticated user.
#[utoipa::path(
    get,
    path = "/flux",
    responses(
        (status = 200, description = "Feed entries, newest first", body = Vec<Object>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "feed"
)]
pub(crate) async fn flux(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<FeedEntry>> {
    let follows = state.follows.list();
    let tickets = state.tickets.list();
    let reviews = state.reviews.list();
    Json(feed(user.id, &follows, &tickets, &reviews))
}

/// GET /posts — The authenticated user's own tickets and reviews.
#[utoipa::path(
    get,
    path = "/posts",
    responses(
        (status = 200, description = "Own posts, newest first", body = Vec<Object>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "feed"
)]
pub(crate) async fn posts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Vec<FeedEntry>> {
    let tickets = state.tickets.list();
    let reviews = state.reviews.list();
    Json(own_posts(user.id, &tickets, &reviews))
}
