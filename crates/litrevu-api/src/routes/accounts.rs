//! # Accounts — Signup, Login, Logout
//!
//! ## Endpoints
//!
//! - `POST /signup` — register an account
//! - `POST /login` — verify credentials, open a session
//! - `POST /logout` — revoke the presented session
//!
//! Usernames are unique across the service. Passwords are stored as
//! salted SHA-256 digests and verified in constant time (see `auth`).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{hash_password, open_session, verify_password, CurrentUser};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, UserRecord};
use litrevu_core::Username;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to register a new account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Desired username, unique across the service.
    pub username: String,
    /// Password, at least 8 characters.
    pub password: String,
    /// Must match `password` exactly.
    pub password_confirm: String,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        if self.password != self.password_confirm {
            return Err("password confirmation does not match".to_string());
        }
        Ok(())
    }
}

/// Request to open a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Publicly visible account projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.to_string(),
        }
    }
}

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// Opaque bearer token to present in the Authorization header.
    pub token: Uuid,
    /// The authenticated account.
    pub user: UserResponse,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Build the unauthenticated accounts router (signup, login).
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Build the authenticated accounts router (logout).
pub fn session_router() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /signup — Register a new account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 409, description = "Username already taken", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let username = Username::new(req.username)?;

    if state
        .users
        .list()
        .iter()
        .any(|u| u.username == username)
    {
        return Err(AppError::Conflict(format!(
            "username {username} is already taken"
        )));
    }

    let salt = Uuid::new_v4().to_string();
    let record = UserRecord {
        id: Uuid::new_v4(),
        username,
        password_digest: hash_password(&req.password, &salt),
        password_salt: salt,
        created_at: Utc::now(),
    };

    if let Some(pool) = &state.db_pool {
        crate::db::users::insert(pool, &record).await?;
    }

    let response = UserResponse::from(&record);
    state.users.insert(record.id, record);
    tracing::info!(user = %response.id, "account created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /login — Verify credentials and open a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let req = extract_json(body)?;

    // The same response for unknown usernames and wrong passwords, so the
    // endpoint does not confirm which usernames exist.
    let account = state
        .users
        .list()
        .into_iter()
        .find(|u| u.username == req.username.as_str())
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !verify_password(&req.password, &account.password_salt, &account.password_digest) {
        tracing::warn!(user = %account.id, "login failed: wrong password");
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = open_session(&state, account.id);
    tracing::info!(user = %account.id, "session opened");

    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(&account),
    }))
}

/// POST /logout — Revoke the presented session.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "accounts"
)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> StatusCode {
    state.sessions.remove(&user.session);
    tracing::info!(user = %user.id, "session revoked");
    StatusCode::NO_CONTENT
}
