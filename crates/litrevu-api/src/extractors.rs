//! # Request Extractors
//!
//! Validated JSON extraction. Handlers take `Result<Json<T>, JsonRejection>`
//! and pass it through [`extract_validated_json`], which turns body parse
//! failures into 400s and [`Validate`] failures into 422s, so malformed
//! input never reaches domain logic.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;
use litrevu_core::{ReviewDraft, TicketDraft};

/// Request payloads that carry their own validation rules.
pub trait Validate {
    /// Check the payload, returning a human-readable reason on failure.
    fn validate(&self) -> Result<(), String>;
}

impl Validate for TicketDraft {
    fn validate(&self) -> Result<(), String> {
        TicketDraft::validate(self).map_err(|e| e.to_string())
    }
}

impl Validate for ReviewDraft {
    fn validate(&self) -> Result<(), String> {
        ReviewDraft::validate(self).map_err(|e| e.to_string())
    }
}

/// Unwrap a JSON body, mapping rejections to 400 and validation to 422.
pub fn extract_validated_json<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("invalid request body: {rejection}"))
    })?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Unwrap a JSON body without domain validation, mapping rejections to 400.
///
/// Used for payloads validated further downstream, such as credentials.
pub fn extract_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("invalid request body: {rejection}"))
    })?;
    Ok(value)
}
