//! # HTTP Routes
//!
//! Route modules for the LITRevu API surface:
//!
//! - [`accounts`] — signup, login, logout
//! - [`feed`] — the aggregated feed (`/flux`) and the own-posts view
//! - [`subscriptions`] — follow graph management
//! - [`tickets`] — ticket CRUD
//! - [`reviews`] — review CRUD and the compound ticket+review create
//!
//! Every mutation of a ticket or review passes the ownership guard; a
//! denial is rendered by [`redirect_to_posts`], not as an error body.

pub mod accounts;
pub mod feed;
pub mod reviews;
pub mod subscriptions;
pub mod tickets;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// The silent denial response for ownership violations.
///
/// A non-owner attempting to edit or delete someone else's ticket or
/// review is sent back to their own posts view with an empty body. No
/// error payload is returned, so the response does not confirm whether
/// the entity exists.
pub(crate) fn redirect_to_posts() -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, "/posts")]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn redirect_targets_posts_with_empty_body() {
        let response = redirect_to_posts();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/posts");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
