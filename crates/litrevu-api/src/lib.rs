//! # litrevu-api — Axum API Service for LITRevu
//!
//! LITRevu is a small social network for book and literature reviews:
//! users post tickets asking for a review, answer tickets with rated
//! reviews, follow each other, and read a reverse-chronological feed of
//! everything posted by the people they follow.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                     | Domain            |
//! |-------------------------|----------------------------|-------------------|
//! | `/signup`, `/login`, `/logout` | [`routes::accounts`] | Accounts & sessions |
//! | `/flux`, `/posts`       | [`routes::feed`]           | Feed views        |
//! | `/subscriptions/*`      | [`routes::subscriptions`]  | Follow graph      |
//! | `/tickets/*`            | [`routes::tickets`]        | Tickets           |
//! | `/reviews/*`            | [`routes::reviews`]        | Reviews           |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → RateLimitMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`), signup, login, and the OpenAPI spec are
/// mounted outside the auth middleware so they remain accessible without
/// a session.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(RateLimitConfig::default());

    // Unauthenticated routes (accounts entry points, OpenAPI).
    let public = Router::new()
        .merge(routes::accounts::public_router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(metrics.clone()))
        .with_state(state.clone());

    // Session-authenticated API routes.
    let api = Router::new()
        .merge(routes::accounts::session_router())
        .merge(routes::feed::router())
        .merge(routes::subscriptions::router())
        .merge(routes::tickets::router())
        .merge(routes::reviews::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(metrics))
        .layer(axum::Extension(limiter))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(public).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
