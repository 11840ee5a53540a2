//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use shiftwise_core::error::AppError;

use crate::error::ApiError;

/// Identity of the actor making the request.
///
/// Token verification happens upstream (gateway/middleware, out of scope
/// here); by the time a request reaches a handler the resolved account id
/// is carried in the `x-requester-id` header.
#[derive(Debug, Clone, Copy)]
pub struct RequesterId(pub i64);

impl<S> FromRequestParts<S> for RequesterId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("x-requester-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::validation("Missing x-requester-id header"))?;

        value
            .parse::<i64>()
            .map(RequesterId)
            .map_err(|_| ApiError(AppError::validation("x-requester-id must be an integer")))
    }
}
