//! # Subscriptions — Follow Graph Management
//!
//! ## Endpoints
//!
//! - `GET /subscriptions` — the subscriptions view: other users,
//!   who the requester follows, and who follows them
//! - `POST /subscriptions` — follow a user by username
//! - `POST /subscriptions/:user_id/unfollow` — remove a follow edge
//!
//! Following an unknown username is a benign no-op: the view is returned
//! unchanged and the miss is logged. Unfollowing without an edge is an
//! explicit 404. Edge planning lives in `litrevu_core::follow`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::accounts::UserResponse;
use crate::state::AppState;
use litrevu_core::{find_edge, followers, plan_follow, subscriptions, FollowOutcome};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to follow a user by username.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FollowRequest {
    /// Username of the user to follow.
    pub username: String,
}

/// The subscriptions view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionsResponse {
    /// Every other registered user, sorted by username.
    pub users: Vec<UserResponse>,
    /// Users the requester follows, in follow order.
    pub subscriptions: Vec<UserResponse>,
    /// Users following the requester, in follow order.
    pub followers: Vec<UserResponse>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the subscriptions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(get_subscriptions).post(follow))
        .route("/subscriptions/:user_id/unfollow", post(unfollow))
}

// ── View Assembly ───────────────────────────────────────────────────

/// Assemble the subscriptions view for `requester`.
fn subscriptions_view(state: &AppState, requester: Uuid) -> SubscriptionsResponse {
    let accounts = state.users.list();
    let edges = state.follows.list();

    let mut users: Vec<UserResponse> = accounts
        .iter()
        .filter(|a| a.id != requester)
        .map(UserResponse::from)
        .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));

    // Edges may reference accounts that no longer exist; those entries
    // are skipped rather than surfaced as errors.
    let resolve = |ids: Vec<Uuid>| -> Vec<UserResponse> {
        ids.into_iter()
            .filter_map(|id| accounts.iter().find(|a| a.id == id))
            .map(UserResponse::from)
            .collect()
    };

    SubscriptionsResponse {
        users,
        subscriptions: resolve(subscriptions(requester, &edges)),
        followers: resolve(followers(requester, &edges)),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /subscriptions — The subscriptions view.
#[utoipa::path(
    get,
    path = "/subscriptions",
    responses(
        (status = 200, description = "Subscriptions view", body = SubscriptionsResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "subscriptions"
)]
pub(crate) async fn get_subscriptions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<SubscriptionsResponse> {
    Json(subscriptions_view(&state, user.id))
}

/// POST /subscriptions — Follow a user by username.
#[utoipa::path(
    post,
    path = "/subscriptions",
    request_body = FollowRequest,
    responses(
        (status = 200, description = "Refreshed subscriptions view", body = SubscriptionsResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "subscriptions"
)]
pub(crate) async fn follow(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<Json<SubscriptionsResponse>, AppError> {
    let req = extract_json(body)?;

    let target = state
        .users
        .list()
        .into_iter()
        .find(|a| a.username == req.username.as_str());

    let Some(target) = target else {
        tracing::warn!(username = %req.username, "follow request for unknown username");
        return Ok(Json(subscriptions_view(&state, user.id)));
    };

    let edges = state.follows.list();
    match plan_follow(user.id, target.id, &edges, Utc::now()) {
        FollowOutcome::Created(edge) => {
            if let Some(pool) = &state.db_pool {
                crate::db::follows::insert(pool, &edge).await?;
            }
            tracing::info!(follower = %user.id, followed = %target.id, "follow edge created");
            state.follows.insert(edge.id, edge);
        }
        FollowOutcome::SelfFollow => {
            tracing::warn!(user = %user.id, "attempted to follow self");
        }
        FollowOutcome::AlreadyFollowing => {}
    }

    Ok(Json(subscriptions_view(&state, user.id)))
}

/// POST /subscriptions/:user_id/unfollow — Remove a follow edge.
#[utoipa::path(
    post,
    path = "/subscriptions/{user_id}/unfollow",
    params(("user_id" = Uuid, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "Refreshed subscriptions view", body = SubscriptionsResponse),
        (status = 404, description = "No follow edge for that user", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "subscriptions"
)]
pub(crate) async fn unfollow(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SubscriptionsResponse>, AppError> {
    let edges = state.follows.list();
    let edge = find_edge(user.id, user_id, &edges)
        .ok_or_else(|| AppError::NotFound(format!("no subscription to user {user_id}")))?;
    let edge_id = edge.id;

    if let Some(pool) = &state.db_pool {
        crate::db::follows::delete(pool, edge_id).await?;
    }
    state.follows.remove(&edge_id);
    tracing::info!(follower = %user.id, followed = %user_id, "follow edge removed");

    Ok(Json(subscriptions_view(&state, user.id)))
}
