//! Caller identity extractor.
//!
//! The service is stateless: clients identify themselves with the
//! `X-User-Id` header on every mutating request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// The header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// User ID of the caller, taken from the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::BadRequest("Missing X-User-Id header".to_string()))?;

        let value = value
            .to_str()
            .map_err(|_| ApiError::BadRequest("Invalid X-User-Id header".to_string()))?;

        Uuid::parse_str(value.trim())
            .map(UserId)
            .map_err(|_| ApiError::BadRequest("X-User-Id must be a valid UUID".to_string()))
    }
}
