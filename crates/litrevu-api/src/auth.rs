//! # Sessions & Authentication Middleware
//!
//! Opaque bearer-token sessions backed by the in-memory session store.
//!
//! ## Flow
//!
//! `POST /login` verifies credentials and issues a UUIDv4 session token.
//! Every request to the authenticated router presents it as
//! `Authorization: Bearer <token>`; the middleware resolves the session,
//! looks up the account, and injects a [`CurrentUser`] into the request
//! extensions. Handlers extract it via `FromRequestParts` — identity is an
//! explicit parameter, never ambient state.
//!
//! ## Credentials
//!
//! Passwords are stored as hex-encoded salted SHA-256 digests with a
//! per-user random salt. Verification compares digests in constant time.

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::{AppState, SessionRecord};
use litrevu_core::Username;

// ── CurrentUser ─────────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the session and
/// available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// The caller's user id.
    pub id: Uuid,
    /// The caller's username.
    pub username: Username,
    /// The session token this request authenticated with.
    /// Needed by logout to revoke exactly this session.
    pub session: Uuid,
}

/// Axum `FromRequestParts` implementation for `CurrentUser`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no session in request context".into()))
    }
}

// ── Password Digests ────────────────────────────────────────────────────────

/// Hex-encode a byte slice.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute the hex-encoded salted SHA-256 digest of a password.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex_encode(&hasher.finalize())
}

/// Constant-time verification of a password against a stored digest.
///
/// Recomputes the digest and compares the fixed-length hex strings with
/// `subtle`, preventing timing side-channels on the comparison.
pub fn verify_password(password: &str, salt: &str, expected_digest: &str) -> bool {
    let computed = hash_password(password, salt);
    let computed = computed.as_bytes();
    let expected = expected_digest.as_bytes();
    if computed.len() != expected.len() {
        // Dummy comparison to keep timing constant regardless of length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    computed.ct_eq(expected).into()
}

// ── Session Lifecycle ───────────────────────────────────────────────────────

/// Open a session for `user` and return its opaque token.
pub fn open_session(state: &AppState, user: Uuid) -> Uuid {
    let token = Uuid::new_v4();
    state.sessions.insert(
        token,
        SessionRecord {
            token,
            user,
            created_at: Utc::now(),
        },
    );
    token
}

/// Resolve a presented bearer token to the authenticated user.
///
/// `None` for malformed tokens, unknown sessions, and sessions whose
/// account has disappeared (the stale session is dropped).
pub fn resolve_session(state: &AppState, token: &str) -> Option<CurrentUser> {
    let token: Uuid = token.parse().ok()?;
    let session = state.sessions.get(&token)?;
    match state.users.get(&session.user) {
        Some(account) => Some(CurrentUser {
            id: account.id,
            username: account.username,
            session: token,
        }),
        None => {
            tracing::warn!(session = %token, "session references a missing account — revoking");
            state.sessions.remove(&token);
            None
        }
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Extract and validate the bearer session token from the Authorization
/// header, injecting a [`CurrentUser`] for downstream handlers.
///
/// Unauthenticated requests are answered with a 401 JSON error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match auth_header.as_deref() {
        Some(header_value) if header_value.starts_with("Bearer ") => {
            let token = &header_value[7..];
            match resolve_session(&state, token) {
                Some(user) => {
                    request.extensions_mut().insert(user);
                    next.run(request).await
                }
                None => {
                    tracing::warn!("authentication failed: unknown or malformed session token");
                    unauthorized_response("invalid or expired session token")
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
