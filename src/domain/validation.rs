//! Field-level validation errors shared by the trip form and contact form.

use std::borrow::Cow;
use thiserror::Error;

pub const MIN_DESTINATION_LEN: usize = 2;
pub const MIN_TRAVELERS: i64 = 1;
pub const MAX_TRAVELERS: i64 = 10;
/// Longest trip, in days, that can be planned or rendered.
pub const MAX_TRIP_DAYS: u32 = 30;
/// Minimum daily budget, in INR.
pub const MIN_DAILY_BUDGET: i64 = 1000;
pub const MAX_SPECIAL_REQUIREMENTS_LEN: usize = 1000;

/// The first failing field of a form, with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// camelCase field name, or a dotted path into a JSON body.
    pub field: Cow<'static, str>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
