//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! The in-memory [`Store`]s are authoritative for reads. When a Postgres
//! pool is attached, mutations are mirrored to the database and the stores
//! are hydrated from it once on startup, so read paths stay synchronous.
//! Sessions are in-memory only — they are ephemeral by design and do not
//! survive a restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use litrevu_core::{Follow, Review, Ticket, User, Username};
use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

// ── Generic In-Memory Store ─────────────────────────────────────────────────

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure may inspect the current state, validate preconditions,
    /// mutate the record, and return `Ok(R)` or `Err(E)`. The entire
    /// operation runs under a single write lock, eliminating TOCTOU races
    /// between read and update.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with
    /// the closure's `Result`.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Remove every record matching the predicate, returning the removed values.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut guard = self.data.write();
        let ids: Vec<Uuid> = guard
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(k, _)| *k)
            .collect();
        ids.iter().filter_map(|id| guard.remove(id)).collect()
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── API-Layer Record Types ──────────────────────────────────────────────────

/// A registered user together with their credentials.
///
/// The credential fields never leave this layer: responses expose the
/// domain [`User`] via [`UserRecord::public`]. Custom `Debug` redacts the
/// digest and salt to prevent credential leakage in logs.
#[derive(Clone)]
pub struct UserRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Login/display name, unique across the service.
    pub username: Username,
    /// Per-user random salt for the password digest.
    pub password_salt: String,
    /// Hex-encoded salted SHA-256 digest of the password.
    pub password_digest: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The publicly visible projection of this account.
    pub fn public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_salt", &"[REDACTED]")
            .field("password_digest", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// An active login session. Keyed by its opaque token in the session store.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The opaque bearer token identifying this session.
    pub token: Uuid,
    /// The authenticated user.
    pub user: Uuid,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
}

// ── Application State ───────────────────────────────────────────────────────

/// Application configuration, read from the environment in `main.rs`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each `Store`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registered accounts (credentials included — never serialized).
    pub users: Store<UserRecord>,
    /// Active sessions, keyed by bearer token.
    pub sessions: Store<SessionRecord>,
    /// All tickets.
    pub tickets: Store<Ticket>,
    /// All reviews.
    pub reviews: Store<Review>,
    /// All follow edges.
    pub follows: Store<Follow>,

    /// PostgreSQL connection pool for durable persistence.
    /// When `Some`, user/ticket/review/follow mutations are mirrored to
    /// Postgres. When `None`, the API operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,

    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration and no pool.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            users: Store::new(),
            sessions: Store::new(),
            tickets: Store::new(),
            reviews: Store::new(),
            follows: Store::new(),
            db_pool,
            config,
        }
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available. Loads all
    /// persisted users, tickets, reviews, and follow edges into the
    /// in-memory stores so that read operations remain fast and synchronous.
    /// Sessions are not persisted and start empty.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let users = crate::db::users::load_all(pool).await?;
        let user_count = users.len();
        for record in users {
            self.users.insert(record.id, record);
        }

        let tickets = crate::db::tickets::load_all(pool).await?;
        let ticket_count = tickets.len();
        for record in tickets {
            self.tickets.insert(record.id, record);
        }

        let reviews = crate::db::reviews::load_all(pool).await?;
        let review_count = reviews.len();
        for record in reviews {
            self.reviews.insert(record.id, record);
        }

        let follows = crate::db::follows::load_all(pool).await?;
        let follow_count = follows.len();
        for record in follows {
            self.follows.insert(record.id, record);
        }

        tracing::info!(
            users = user_count,
            tickets = ticket_count,
            reviews = review_count,
            follows = follow_count,
            "hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
