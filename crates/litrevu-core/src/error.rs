//! # Validation Errors
//!
//! Structured field-constraint errors, built with `thiserror`. Each variant
//! carries the offending value or the violated limit so that callers can
//! re-render a form with a precise message instead of a blanket failure.

use thiserror::Error;

/// A field constraint was violated while validating a draft or newtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty or exceeds the maximum length.
    #[error("invalid username: \"{0}\" (expected 1-150 characters)")]
    InvalidUsername(String),

    /// Ticket title is required.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Ticket title exceeds the maximum length.
    #[error("title must not exceed {max} characters (got {len})")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length of the rejected title.
        len: usize,
    },

    /// Ticket description exceeds the maximum length.
    #[error("description must not exceed {max} characters (got {len})")]
    DescriptionTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length of the rejected description.
        len: usize,
    },

    /// Review rating is outside the permitted 0..=5 range.
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(u8),

    /// Review headline is required.
    #[error("headline must not be empty")]
    EmptyHeadline,

    /// Review headline exceeds the maximum length.
    #[error("headline must not exceed {max} characters (got {len})")]
    HeadlineTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length of the rejected headline.
        len: usize,
    },

    /// Review body is required.
    #[error("review body must not be empty")]
    EmptyBody,

    /// Review body exceeds the maximum length.
    #[error("review body must not exceed {max} characters (got {len})")]
    BodyTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length of the rejected body.
        len: usize,
    },
}
