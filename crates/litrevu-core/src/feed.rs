//! # Feed Aggregation
//!
//! Merges a user's own and followed-users' tickets and reviews into one
//! reverse-chronological sequence, annotating each entry with presentation
//! metadata: a has-review flag for tickets and a star breakdown for reviews.
//!
//! Two views exist over the same merge:
//!
//! - [`feed`] — visible set is `{requester} ∪ followed(requester)`; ticket
//!   entries carry `has_review`.
//! - [`own_posts`] — visible set is exactly the requester; ticket entries
//!   carry no annotation.
//!
//! ## Ordering
//!
//! Entries are sorted by `created_at` descending. Ties are broken
//! deterministically: reviews order before tickets, then by id, so repeated
//! aggregation over the same data always yields the same sequence.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Follow, Rating, Review, Ticket};

/// Star rendering breakdown for a review entry.
///
/// `full == rating` and `full + empty == 5`, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarBreakdown {
    /// Number of filled star units.
    pub full: u8,
    /// Number of empty star units.
    pub empty: u8,
}

impl From<Rating> for StarBreakdown {
    fn from(rating: Rating) -> Self {
        Self {
            full: rating.full_stars(),
            empty: rating.empty_stars(),
        }
    }
}

/// One entry in a rendered feed: a ticket or a review, with presentation
/// metadata. Constructed per-request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEntry {
    /// A ticket, optionally annotated with whether any review answers it.
    Ticket {
        /// The ticket record.
        ticket: Ticket,
        /// `Some(true)` iff at least one review references the ticket.
        /// `None` in the own-posts view, which carries no annotation.
        #[serde(skip_serializing_if = "Option::is_none")]
        has_review: Option<bool>,
    },
    /// A review with its star breakdown.
    Review {
        /// The review record.
        review: Review,
        /// Filled/empty star counts for rendering.
        stars: StarBreakdown,
    },
}

impl FeedEntry {
    /// The timestamp that positions this entry in the feed.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Ticket { ticket, .. } => ticket.created_at,
            Self::Review { review, .. } => review.created_at,
        }
    }

    /// The id of the underlying record.
    pub fn entry_id(&self) -> Uuid {
        match self {
            Self::Ticket { ticket, .. } => ticket.id,
            Self::Review { review, .. } => review.id,
        }
    }

    // Tie-break rank: reviews order before tickets at equal timestamps.
    fn kind_rank(&self) -> u8 {
        match self {
            Self::Review { .. } => 0,
            Self::Ticket { .. } => 1,
        }
    }
}

/// The set of owners whose posts are visible to `requester`:
/// the requester plus everyone they follow.
pub fn visible_owners(requester: Uuid, follows: &[Follow]) -> HashSet<Uuid> {
    let mut owners: HashSet<Uuid> = follows
        .iter()
        .filter(|edge| edge.follower == requester)
        .map(|edge| edge.followed)
        .collect();
    owners.insert(requester);
    owners
}

/// Aggregate the full feed for `requester`.
///
/// `tickets` and `reviews` are the complete collections; visibility
/// filtering happens here so the rule lives in one place. The `has_review`
/// annotation is computed against **all** reviews, not just visible ones —
/// a ticket answered by someone the requester does not follow still shows
/// as answered.
pub fn feed(
    requester: Uuid,
    follows: &[Follow],
    tickets: &[Ticket],
    reviews: &[Review],
) -> Vec<FeedEntry> {
    let visible = visible_owners(requester, follows);
    let reviewed: HashSet<Uuid> = reviews.iter().map(|review| review.ticket).collect();

    let ticket_entries = tickets
        .iter()
        .filter(|ticket| visible.contains(&ticket.owner))
        .map(|ticket| FeedEntry::Ticket {
            ticket: ticket.clone(),
            has_review: Some(reviewed.contains(&ticket.id)),
        });

    let review_entries = reviews
        .iter()
        .filter(|review| visible.contains(&review.owner))
        .map(|review| FeedEntry::Review {
            review: review.clone(),
            stars: StarBreakdown::from(review.rating),
        });

    sort_entries(ticket_entries.chain(review_entries).collect())
}

/// Aggregate the own-posts view for `requester`: only their tickets and
/// reviews, with no `has_review` lookup.
pub fn own_posts(requester: Uuid, tickets: &[Ticket], reviews: &[Review]) -> Vec<FeedEntry> {
    let ticket_entries = tickets
        .iter()
        .filter(|ticket| ticket.owner == requester)
        .map(|ticket| FeedEntry::Ticket {
            ticket: ticket.clone(),
            has_review: None,
        });

    let review_entries = reviews
        .iter()
        .filter(|review| review.owner == requester)
        .map(|review| FeedEntry::Review {
            review: review.clone(),
            stars: StarBreakdown::from(review.rating),
        });

    sort_entries(ticket_entries.chain(review_entries).collect())
}

/// Reverse-chronological sort with a deterministic tie-break.
fn sort_entries(mut entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    entries.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.kind_rank().cmp(&b.kind_rank()))
            .then_with(|| a.entry_id().cmp(&b.entry_id()))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReviewDraft, TicketDraft};
    use chrono::Duration;

    fn ticket(owner: Uuid, title: &str, at: DateTime<Utc>) -> Ticket {
        TicketDraft {
            title: title.to_string(),
            description: String::new(),
            image: None,
        }
        .create(owner, at)
        .unwrap()
    }

    fn review(owner: Uuid, ticket: Uuid, rating: u8, at: DateTime<Utc>) -> Review {
        ReviewDraft {
            rating,
            headline: "headline".to_string(),
            body: "body".to_string(),
            image: None,
        }
        .create(owner, ticket, at)
        .unwrap()
    }

    fn edge(follower: Uuid, followed: Uuid) -> Follow {
        Follow {
            id: Uuid::new_v4(),
            follower,
            followed,
            created_at: Utc::now(),
        }
    }

    // ── Visibility ─────────────────────────────────────────────────

    #[test]
    fn visible_owners_includes_self_and_followed() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let follows = vec![edge(alice, bob)];

        let visible = visible_owners(alice, &follows);
        assert!(visible.contains(&alice));
        assert!(visible.contains(&bob));
        assert!(!visible.contains(&carol));
    }

    #[test]
    fn visible_owners_ignores_reverse_edges() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        // Bob follows Alice — that does not make Bob visible to Alice.
        let follows = vec![edge(bob, alice)];

        let visible = visible_owners(alice, &follows);
        assert!(!visible.contains(&bob));
    }

    #[test]
    fn feed_excludes_non_followed_users() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let now = Utc::now();

        let follows = vec![edge(alice, bob)];
        let tickets = vec![
            ticket(bob, "Dune", now),
            ticket(carol, "Never seen", now + Duration::seconds(10)),
        ];

        let entries = feed(alice, &follows, &tickets, &[]);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            FeedEntry::Ticket { ticket, .. } => assert_eq!(ticket.title, "Dune"),
            other => panic!("expected ticket entry, got {other:?}"),
        }
    }

    #[test]
    fn feed_includes_own_posts() {
        let alice = Uuid::new_v4();
        let tickets = vec![ticket(alice, "My own", Utc::now())];
        let entries = feed(alice, &[], &tickets, &[]);
        assert_eq!(entries.len(), 1);
    }

    // ── Ordering ───────────────────────────────────────────────────

    #[test]
    fn feed_sorted_newest_first() {
        let alice = Uuid::new_v4();
        let base = Utc::now();
        let tickets = vec![
            ticket(alice, "oldest", base),
            ticket(alice, "newest", base + Duration::seconds(20)),
            ticket(alice, "middle", base + Duration::seconds(10)),
        ];

        let entries = feed(alice, &[], &tickets, &[]);
        let titles: Vec<&str> = entries
            .iter()
            .map(|e| match e {
                FeedEntry::Ticket { ticket, .. } => ticket.title.as_str(),
                FeedEntry::Review { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn equal_timestamps_order_reviews_before_tickets() {
        let alice = Uuid::new_v4();
        let now = Utc::now();
        let t = ticket(alice, "Dune", now);
        let r = review(alice, t.id, 3, now);

        let entries = feed(alice, &[], &[t], &[r]);
        assert!(matches!(entries[0], FeedEntry::Review { .. }));
        assert!(matches!(entries[1], FeedEntry::Ticket { .. }));
    }

    // ── has_review ─────────────────────────────────────────────────

    #[test]
    fn ticket_without_review_not_flagged() {
        let alice = Uuid::new_v4();
        let t = ticket(alice, "Dune", Utc::now());
        let entries = feed(alice, &[], &[t], &[]);
        match &entries[0] {
            FeedEntry::Ticket { has_review, .. } => assert_eq!(*has_review, Some(false)),
            other => panic!("expected ticket entry, got {other:?}"),
        }
    }

    #[test]
    fn ticket_with_one_review_flagged() {
        let alice = Uuid::new_v4();
        let now = Utc::now();
        let t = ticket(alice, "Dune", now);
        let r = review(alice, t.id, 4, now + Duration::seconds(1));

        let entries = feed(alice, &[], &[t.clone()], &[r]);
        let flag = entries
            .iter()
            .find_map(|e| match e {
                FeedEntry::Ticket { has_review, .. } => *has_review,
                FeedEntry::Review { .. } => None,
            })
            .unwrap();
        assert!(flag);
    }

    #[test]
    fn ticket_with_two_reviews_still_flagged() {
        // "At least one", not "exactly one": a second review must not
        // unflag the ticket.
        let alice = Uuid::new_v4();
        let now = Utc::now();
        let t = ticket(alice, "Dune", now);
        let r1 = review(alice, t.id, 4, now + Duration::seconds(1));
        let r2 = review(alice, t.id, 1, now + Duration::seconds(2));

        let entries = feed(alice, &[], &[t], &[r1, r2]);
        let flag = entries
            .iter()
            .find_map(|e| match e {
                FeedEntry::Ticket { has_review, .. } => *has_review,
                FeedEntry::Review { .. } => None,
            })
            .unwrap();
        assert!(flag);
    }

    #[test]
    fn has_review_counts_reviews_from_non_followed_users() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let now = Utc::now();

        let follows = vec![edge(alice, bob)];
        let t = ticket(bob, "Dune", now);
        // Carol's review is not visible to Alice, but it still answers the ticket.
        let r = review(carol, t.id, 5, now + Duration::seconds(1));

        let entries = feed(alice, &follows, &[t], &[r]);
        assert_eq!(entries.len(), 1, "carol's review itself must not appear");
        match &entries[0] {
            FeedEntry::Ticket { has_review, .. } => assert_eq!(*has_review, Some(true)),
            other => panic!("expected ticket entry, got {other:?}"),
        }
    }

    // ── Stars ──────────────────────────────────────────────────────

    #[test]
    fn star_breakdown_sums_to_five() {
        for value in 0..=5u8 {
            let stars = StarBreakdown::from(Rating::new(value).unwrap());
            assert_eq!(stars.full, value);
            assert_eq!(stars.full + stars.empty, 5);
        }
    }

    #[test]
    fn review_entry_carries_breakdown() {
        let alice = Uuid::new_v4();
        let now = Utc::now();
        let t = ticket(alice, "Dune", now);
        let r = review(alice, t.id, 4, now + Duration::seconds(1));

        let entries = feed(alice, &[], &[t], &[r]);
        match &entries[0] {
            FeedEntry::Review { stars, .. } => {
                assert_eq!(stars.full, 4);
                assert_eq!(stars.empty, 1);
            }
            other => panic!("expected review entry first, got {other:?}"),
        }
    }

    // ── Own posts ──────────────────────────────────────────────────

    #[test]
    fn own_posts_restricted_to_requester() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let now = Utc::now();
        let tickets = vec![ticket(alice, "Mine", now), ticket(bob, "Not mine", now)];

        let entries = own_posts(alice, &tickets, &[]);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn own_posts_omits_has_review() {
        let alice = Uuid::new_v4();
        let now = Utc::now();
        let t = ticket(alice, "Mine", now);
        let r = review(alice, t.id, 5, now + Duration::seconds(1));

        let entries = own_posts(alice, &[t], &[r]);
        match &entries[1] {
            FeedEntry::Ticket { has_review, .. } => assert!(has_review.is_none()),
            other => panic!("expected ticket entry, got {other:?}"),
        }
    }

    #[test]
    fn own_posts_ticket_entry_serializes_without_annotation() {
        let alice = Uuid::new_v4();
        let t = ticket(alice, "Mine", Utc::now());
        let entries = own_posts(alice, &[t], &[]);
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["type"], "ticket");
        assert!(json.get("has_review").is_none());
    }

    // ── Scenario from the product walkthrough ──────────────────────

    #[test]
    fn alice_bob_carol_scenario() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let base = Utc::now();

        let follows = vec![edge(alice, bob)];
        let dune = ticket(bob, "Dune", base);
        let mut tickets = vec![dune.clone()];

        // Alice's feed: one unanswered ticket.
        let entries = feed(alice, &follows, &tickets, &[]);
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            FeedEntry::Ticket { ticket, has_review } => {
                assert_eq!(ticket.title, "Dune");
                assert_eq!(*has_review, Some(false));
            }
            other => panic!("expected ticket entry, got {other:?}"),
        }

        // Carol posts a ticket — never appears in Alice's feed.
        tickets.push(ticket(carol, "Invisible", base + Duration::seconds(1)));
        let entries = feed(alice, &follows, &tickets, &[]);
        assert_eq!(entries.len(), 1);

        // Bob reviews his own ticket with 4 stars.
        let reviews = vec![review(bob, dune.id, 4, base + Duration::seconds(2))];
        let entries = feed(alice, &follows, &tickets, &reviews);
        assert_eq!(entries.len(), 2);
        match &entries[0] {
            FeedEntry::Review { stars, .. } => {
                assert_eq!(stars.full, 4);
                assert_eq!(stars.empty, 1);
            }
            other => panic!("expected review entry first, got {other:?}"),
        }
        match &entries[1] {
            FeedEntry::Ticket { has_review, .. } => assert_eq!(*has_review, Some(true)),
            other => panic!("expected ticket entry, got {other:?}"),
        }
    }

    // ── Property tests ─────────────────────────────────────────────

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_timestamps(len: usize) -> impl Strategy<Value = Vec<i64>> {
            proptest::collection::vec(0i64..1_000_000, len)
        }

        proptest! {
            #[test]
            fn feed_is_sorted_descending(offsets in arb_timestamps(12)) {
                let alice = Uuid::new_v4();
                let base = Utc::now();
                let tickets: Vec<Ticket> = offsets
                    .iter()
                    .map(|&s| ticket(alice, "t", base + Duration::seconds(s)))
                    .collect();

                let entries = feed(alice, &[], &tickets, &[]);
                for pair in entries.windows(2) {
                    prop_assert!(pair[0].created_at() >= pair[1].created_at());
                }
            }

            #[test]
            fn feed_is_deterministic(offsets in arb_timestamps(8)) {
                let alice = Uuid::new_v4();
                let base = Utc::now();
                let tickets: Vec<Ticket> = offsets
                    .iter()
                    .map(|&s| ticket(alice, "t", base + Duration::seconds(s % 3)))
                    .collect();
                let reviews: Vec<Review> = tickets
                    .iter()
                    .map(|t| review(alice, t.id, 3, base + Duration::seconds(1)))
                    .collect();

                let first = feed(alice, &[], &tickets, &reviews);
                let second = feed(alice, &[], &tickets, &reviews);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn stars_sum_invariant(rating in 0u8..=5) {
                let stars = StarBreakdown::from(Rating::new(rating).unwrap());
                prop_assert_eq!(stars.full, rating);
                prop_assert_eq!(stars.full + stars.empty, 5);
            }
        }
    }
}
