#![deny(missing_docs)]

//! # litrevu-core — Domain Logic for LITRevu
//!
//! LITRevu is a book-review social service: users post **tickets** (requests
//! for a review of a work), answer them with **reviews** (rated critiques),
//! and follow one another. This crate holds the rules of that domain and
//! nothing else — no I/O, no async, no web types. The HTTP layer lives in
//! `litrevu-api`.
//!
//! ## Design Principles
//!
//! 1. **Explicit actors.** Every operation that depends on identity takes the
//!    acting user as a parameter. There is no ambient "current user".
//!
//! 2. **Typed inputs, pure validation.** Mutations are described by draft
//!    structs ([`TicketDraft`], [`ReviewDraft`]) whose `validate()` returns
//!    `Result<(), ValidationError>` — field constraints are checked before
//!    any record is constructed.
//!
//! 3. **Validated newtypes.** [`Rating`] cannot hold a value outside 0..=5;
//!    [`Username`] cannot be empty or oversized. Invalid states are
//!    unrepresentable once past the constructor.
//!
//! 4. **Guards at the seam.** The [`ownership`] module is the single place
//!    where "only the owner may mutate" is decided; callers choose how to
//!    render a denial.

pub mod error;
pub mod feed;
pub mod follow;
pub mod model;
pub mod ownership;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use feed::{feed, own_posts, FeedEntry, StarBreakdown};
pub use follow::{find_edge, followers, plan_follow, subscriptions, FollowOutcome};
pub use model::{Follow, Rating, Review, ReviewDraft, Ticket, TicketDraft, User, Username};
pub use ownership::{authorize, Forbidden, Owned};
