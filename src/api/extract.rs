//! Request extractors whose rejections use the API error body.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json`, but a malformed body is answered with
/// `{code, message, field?}` instead of a plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
