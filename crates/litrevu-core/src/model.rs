//! # Domain Records & Typed Inputs
//!
//! The four persistent record types ([`User`], [`Ticket`], [`Review`],
//! [`Follow`]), the validated newtypes they are built from, and the draft
//! structs that describe create/edit submissions.
//!
//! Drafts replace duck-typed form handling: each mutating operation has a
//! typed input whose `validate()` is a pure function over its fields. The
//! record constructors (`TicketDraft::create`, `ReviewDraft::create`) only
//! produce a record after validation succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum username length (matches the conventional auth-framework limit).
pub const MAX_USERNAME_LEN: usize = 150;
/// Maximum ticket title length.
pub const MAX_TITLE_LEN: usize = 128;
/// Maximum ticket description length.
pub const MAX_DESCRIPTION_LEN: usize = 2048;
/// Maximum review headline length.
pub const MAX_HEADLINE_LEN: usize = 128;
/// Maximum review body length.
pub const MAX_BODY_LEN: usize = 8192;
/// Highest permitted star rating. Ratings are always in `0..=MAX_RATING`.
pub const MAX_RATING: u8 = 5;

// ── Username ────────────────────────────────────────────────────────────────

/// Validated username.
///
/// Serializes/deserializes as a plain string. Validated on construction via
/// [`Username::new`]: surrounding whitespace is trimmed, and the result must
/// be non-empty and at most [`MAX_USERNAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a validated username.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::InvalidUsername(s));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Username {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Rating ──────────────────────────────────────────────────────────────────

/// Validated star rating in `0..=5`.
///
/// Constructed via [`Rating::new`]; a value outside the range is
/// unrepresentable. Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Create a validated rating. Rejects values above [`MAX_RATING`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > MAX_RATING {
            return Err(ValidationError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// The numeric rating value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Number of filled star units when rendering this rating.
    pub fn full_stars(&self) -> u8 {
        self.0
    }

    /// Number of empty star units when rendering this rating.
    /// Always `MAX_RATING - full_stars()`, so the two sum to 5.
    pub fn empty_stars(&self) -> u8 {
        MAX_RATING - self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

/// A registered user, as visible to other users.
///
/// Credentials are not part of the domain model — they belong to the
/// identity layer in `litrevu-api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Display/login name, unique across the service.
    pub username: Username,
}

/// A request for a review of a literary work.
///
/// Owned exclusively by its creator; mutated and deleted only through the
/// ownership guard in [`crate::ownership`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier.
    pub id: Uuid,
    /// The user who created the ticket.
    pub owner: Uuid,
    /// Title of the work the requester wants reviewed. Required.
    pub title: String,
    /// Free-form description. May be empty.
    pub description: String,
    /// Optional cover-image URL. Media storage is an external concern.
    pub image: Option<String>,
    /// Creation timestamp; drives feed ordering.
    pub created_at: DateTime<Utc>,
}

/// A rated critique responding to a [`Ticket`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier.
    pub id: Uuid,
    /// The user who wrote the review.
    pub owner: Uuid,
    /// The ticket this review responds to.
    pub ticket: Uuid,
    /// Star rating, validated to `0..=5`.
    pub rating: Rating,
    /// Short headline. Required.
    pub headline: String,
    /// Full review text. Required.
    pub body: String,
    /// Optional illustration URL.
    pub image: Option<String>,
    /// Creation timestamp; drives feed ordering.
    pub created_at: DateTime<Utc>,
}

/// A directed follow edge: `follower` sees `followed`'s posts in their feed.
///
/// Invariants (enforced at write time by [`crate::follow::plan_follow`]):
/// `follower != followed`, and at most one edge per ordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    /// Unique identifier.
    pub id: Uuid,
    /// The user doing the following.
    pub follower: Uuid,
    /// The user being followed.
    pub followed: Uuid,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

// ── Drafts ──────────────────────────────────────────────────────────────────

/// Typed input for creating or editing a [`Ticket`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    /// Title of the work. Required.
    pub title: String,
    /// Free-form description. Optional in submissions.
    #[serde(default)]
    pub description: String,
    /// Optional cover-image URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl TicketDraft {
    /// Validate field constraints without constructing a record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_len = self.title.trim().chars().count();
        if title_len == 0 {
            return Err(ValidationError::EmptyTitle);
        }
        if title_len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong {
                max: MAX_TITLE_LEN,
                len: title_len,
            });
        }
        let desc_len = self.description.chars().count();
        if desc_len > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LEN,
                len: desc_len,
            });
        }
        Ok(())
    }

    /// Validate and construct a new ticket owned by `owner`.
    pub fn create(self, owner: Uuid, now: DateTime<Utc>) -> Result<Ticket, ValidationError> {
        self.validate()?;
        Ok(Ticket {
            id: Uuid::new_v4(),
            owner,
            title: self.title.trim().to_string(),
            description: self.description,
            image: self.image,
            created_at: now,
        })
    }

    /// Validate and apply this draft to an existing ticket in place.
    ///
    /// Ownership must already have been checked; `created_at` and `owner`
    /// are never touched by an edit.
    pub fn apply(self, ticket: &mut Ticket) -> Result<(), ValidationError> {
        self.validate()?;
        ticket.title = self.title.trim().to_string();
        ticket.description = self.description;
        ticket.image = self.image;
        Ok(())
    }
}

/// Typed input for creating or editing a [`Review`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    /// Star rating, expected in `0..=5`.
    pub rating: u8,
    /// Short headline. Required.
    pub headline: String,
    /// Full review text. Required.
    pub body: String,
    /// Optional illustration URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl ReviewDraft {
    /// Validate field constraints without constructing a record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Rating::new(self.rating)?;
        let headline_len = self.headline.trim().chars().count();
        if headline_len == 0 {
            return Err(ValidationError::EmptyHeadline);
        }
        if headline_len > MAX_HEADLINE_LEN {
            return Err(ValidationError::HeadlineTooLong {
                max: MAX_HEADLINE_LEN,
                len: headline_len,
            });
        }
        let body_len = self.body.trim().chars().count();
        if body_len == 0 {
            return Err(ValidationError::EmptyBody);
        }
        if body_len > MAX_BODY_LEN {
            return Err(ValidationError::BodyTooLong {
                max: MAX_BODY_LEN,
                len: body_len,
            });
        }
        Ok(())
    }

    /// Validate and construct a new review of `ticket` owned by `owner`.
    pub fn create(
        self,
        owner: Uuid,
        ticket: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Review, ValidationError> {
        self.validate()?;
        let rating = Rating::new(self.rating)?;
        Ok(Review {
            id: Uuid::new_v4(),
            owner,
            ticket,
            rating,
            headline: self.headline.trim().to_string(),
            body: self.body,
            image: self.image,
            created_at: now,
        })
    }

    /// Validate and apply this draft to an existing review in place.
    ///
    /// Ownership must already have been checked; `created_at`, `owner`, and
    /// the referenced ticket are never touched by an edit.
    pub fn apply(self, review: &mut Review) -> Result<(), ValidationError> {
        self.validate()?;
        review.rating = Rating::new(self.rating)?;
        review.headline = self.headline.trim().to_string();
        review.body = self.body;
        review.image = self.image;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_draft() -> TicketDraft {
        TicketDraft {
            title: "Dune".to_string(),
            description: "Looking for opinions on the Herbert classic.".to_string(),
            image: None,
        }
    }

    fn review_draft() -> ReviewDraft {
        ReviewDraft {
            rating: 4,
            headline: "A masterpiece".to_string(),
            body: "Dense but rewarding.".to_string(),
            image: None,
        }
    }

    // ── Username ───────────────────────────────────────────────────

    #[test]
    fn username_accepts_normal_names() {
        let name = Username::new("alice").unwrap();
        assert_eq!(name, "alice");
    }

    #[test]
    fn username_trims_whitespace() {
        let name = Username::new("  bob  ").unwrap();
        assert_eq!(name.as_str(), "bob");
    }

    #[test]
    fn username_rejects_empty() {
        assert!(Username::new("").is_err());
        assert!(Username::new("   ").is_err());
    }

    #[test]
    fn username_rejects_oversized() {
        let long = "x".repeat(MAX_USERNAME_LEN + 1);
        assert!(Username::new(long).is_err());
    }

    #[test]
    fn username_serializes_transparently() {
        let name = Username::new("carol").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"carol\"");
    }

    // ── Rating ─────────────────────────────────────────────────────

    #[test]
    fn rating_accepts_full_range() {
        for value in 0..=MAX_RATING {
            let rating = Rating::new(value).unwrap();
            assert_eq!(rating.value(), value);
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert_eq!(
            Rating::new(6).unwrap_err(),
            ValidationError::RatingOutOfRange(6)
        );
        assert!(Rating::new(255).is_err());
    }

    #[test]
    fn rating_stars_always_sum_to_five() {
        for value in 0..=MAX_RATING {
            let rating = Rating::new(value).unwrap();
            assert_eq!(rating.full_stars(), value);
            assert_eq!(rating.full_stars() + rating.empty_stars(), MAX_RATING);
        }
    }

    // ── TicketDraft ────────────────────────────────────────────────

    #[test]
    fn ticket_draft_valid() {
        assert!(ticket_draft().validate().is_ok());
    }

    #[test]
    fn ticket_draft_requires_title() {
        let draft = TicketDraft {
            title: "   ".to_string(),
            ..ticket_draft()
        };
        assert_eq!(draft.validate().unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn ticket_draft_rejects_oversized_title() {
        let draft = TicketDraft {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..ticket_draft()
        };
        assert!(matches!(
            draft.validate().unwrap_err(),
            ValidationError::TitleTooLong { .. }
        ));
    }

    #[test]
    fn ticket_draft_allows_empty_description() {
        let draft = TicketDraft {
            description: String::new(),
            ..ticket_draft()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn ticket_create_sets_owner_and_trims_title() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let draft = TicketDraft {
            title: "  Dune  ".to_string(),
            ..ticket_draft()
        };
        let ticket = draft.create(owner, now).unwrap();
        assert_eq!(ticket.owner, owner);
        assert_eq!(ticket.title, "Dune");
        assert_eq!(ticket.created_at, now);
    }

    #[test]
    fn ticket_create_fails_on_invalid_draft() {
        let draft = TicketDraft::default();
        assert!(draft.create(Uuid::new_v4(), Utc::now()).is_err());
    }

    #[test]
    fn ticket_apply_preserves_owner_and_timestamp() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let mut ticket = ticket_draft().create(owner, now).unwrap();

        let edit = TicketDraft {
            title: "Dune Messiah".to_string(),
            description: "Second thoughts.".to_string(),
            image: Some("https://example.org/cover.jpg".to_string()),
        };
        edit.apply(&mut ticket).unwrap();

        assert_eq!(ticket.title, "Dune Messiah");
        assert_eq!(ticket.owner, owner);
        assert_eq!(ticket.created_at, now);
        assert!(ticket.image.is_some());
    }

    // ── ReviewDraft ────────────────────────────────────────────────

    #[test]
    fn review_draft_valid() {
        assert!(review_draft().validate().is_ok());
    }

    #[test]
    fn review_draft_rejects_rating_seven() {
        let draft = ReviewDraft {
            rating: 7,
            ..review_draft()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::RatingOutOfRange(7)
        );
    }

    #[test]
    fn review_draft_accepts_zero_rating() {
        let draft = ReviewDraft {
            rating: 0,
            ..review_draft()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn review_draft_requires_headline_and_body() {
        let no_headline = ReviewDraft {
            headline: String::new(),
            ..review_draft()
        };
        assert_eq!(
            no_headline.validate().unwrap_err(),
            ValidationError::EmptyHeadline
        );

        let no_body = ReviewDraft {
            body: "  ".to_string(),
            ..review_draft()
        };
        assert_eq!(no_body.validate().unwrap_err(), ValidationError::EmptyBody);
    }

    #[test]
    fn review_create_links_owner_and_ticket() {
        let owner = Uuid::new_v4();
        let ticket = Uuid::new_v4();
        let review = review_draft().create(owner, ticket, Utc::now()).unwrap();
        assert_eq!(review.owner, owner);
        assert_eq!(review.ticket, ticket);
        assert_eq!(review.rating.value(), 4);
    }

    #[test]
    fn review_apply_preserves_ticket_link() {
        let ticket_id = Uuid::new_v4();
        let mut review = review_draft()
            .create(Uuid::new_v4(), ticket_id, Utc::now())
            .unwrap();

        let edit = ReviewDraft {
            rating: 2,
            headline: "On reflection".to_string(),
            body: "It drags in the middle.".to_string(),
            image: None,
        };
        edit.apply(&mut review).unwrap();

        assert_eq!(review.rating.value(), 2);
        assert_eq!(review.ticket, ticket_id);
    }

    #[test]
    fn review_apply_rejects_invalid_rating_without_mutation() {
        let mut review = review_draft()
            .create(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
            .unwrap();
        let before = review.clone();

        let edit = ReviewDraft {
            rating: 9,
            ..review_draft()
        };
        assert!(edit.apply(&mut review).is_err());
        assert_eq!(review, before);
    }
}
