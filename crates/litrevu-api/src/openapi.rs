//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LITRevu API",
        version = "0.3.2",
        description = "Book and literature review service: tickets requesting reviews, rated reviews, a follow graph, and a reverse-chronological feed.",
        license(name = "MIT")
    ),
    paths(
        // Accounts
        crate::routes::accounts::signup,
        crate::routes::accounts::login,
        crate::routes::accounts::logout,
        // Feed
        crate::routes::feed::flux,
        crate::routes::feed::posts,
        // Subscriptions
        crate::routes::subscriptions::get_subscriptions,
        crate::routes::subscriptions::follow,
        crate::routes::subscriptions::unfollow,
        // Tickets
        crate::routes::tickets::create_ticket,
        crate::routes::tickets::get_ticket,
        crate::routes::tickets::update_ticket,
        crate::routes::tickets::delete_ticket,
        // Reviews
        crate::routes::reviews::create_review,
        crate::routes::reviews::create_compound,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Account DTOs
        crate::routes::accounts::SignupRequest,
        crate::routes::accounts::CredentialsRequest,
        crate::routes::accounts::UserResponse,
        crate::routes::accounts::SessionResponse,
        // Subscription DTOs
        crate::routes::subscriptions::FollowRequest,
        crate::routes::subscriptions::SubscriptionsResponse,
        // Review DTOs
        crate::routes::reviews::CompoundReviewRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "accounts", description = "Signup, login, and session management"),
        (name = "feed", description = "Aggregated feed and own-posts views"),
        (name = "subscriptions", description = "Follow graph management"),
        (name = "tickets", description = "Tickets requesting a review"),
        (name = "reviews", description = "Reviews, standalone and compound"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by the handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token from POST /login"))
                        .build(),
                ),
            );
        }
    }
}

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates_and_serializes() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();

        let paths = json["paths"].as_object().unwrap();
        for path in [
            "/signup",
            "/login",
            "/logout",
            "/flux",
            "/posts",
            "/subscriptions",
            "/subscriptions/{user_id}/unfollow",
            "/tickets",
            "/tickets/{id}",
            "/tickets/{id}/reviews",
            "/reviews",
            "/reviews/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn spec_registers_bearer_security_scheme() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["components"]["securitySchemes"]["bearer"].is_object());
    }
}
