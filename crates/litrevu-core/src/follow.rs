//! # Follow-Graph Rules
//!
//! Write-time invariants for the directed follow relationship: no
//! self-follow, no duplicate edge. Storage has no uniqueness constraint on
//! the `(follower, followed)` pair, so [`plan_follow`] is the single gate
//! every follow action must pass through.
//!
//! The functions here are pure over a slice of existing edges; the caller
//! owns persistence and decides how each [`FollowOutcome`] is rendered.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::Follow;

/// Verdict of a follow attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge should be persisted.
    Created(Follow),
    /// Target equals the requester. No edge, no error — a benign no-op.
    SelfFollow,
    /// The edge already exists. Idempotent no-op.
    AlreadyFollowing,
}

/// Decide the outcome of `requester` attempting to follow `target`.
///
/// The caller resolves `target` from a username first; an unknown username
/// never reaches this function.
pub fn plan_follow(
    requester: Uuid,
    target: Uuid,
    existing: &[Follow],
    now: DateTime<Utc>,
) -> FollowOutcome {
    if requester == target {
        return FollowOutcome::SelfFollow;
    }
    if find_edge(requester, target, existing).is_some() {
        return FollowOutcome::AlreadyFollowing;
    }
    FollowOutcome::Created(Follow {
        id: Uuid::new_v4(),
        follower: requester,
        followed: target,
        created_at: now,
    })
}

/// Find the edge where `follower` follows `followed`, if any.
pub fn find_edge(follower: Uuid, followed: Uuid, edges: &[Follow]) -> Option<&Follow> {
    edges
        .iter()
        .find(|edge| edge.follower == follower && edge.followed == followed)
}

/// Users that `user` follows, in edge-creation order.
pub fn subscriptions(user: Uuid, edges: &[Follow]) -> Vec<Uuid> {
    let mut followed: Vec<&Follow> = edges.iter().filter(|e| e.follower == user).collect();
    followed.sort_by_key(|e| e.created_at);
    followed.into_iter().map(|e| e.followed).collect()
}

/// Users that follow `user`, in edge-creation order.
pub fn followers(user: Uuid, edges: &[Follow]) -> Vec<Uuid> {
    let mut following: Vec<&Follow> = edges.iter().filter(|e| e.followed == user).collect();
    following.sort_by_key(|e| e.created_at);
    following.into_iter().map(|e| e.follower).collect()
}
