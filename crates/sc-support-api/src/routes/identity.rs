//! Caller identification from the `user-id` request header.

use axum::extract::FromRequestParts;
use axum::extract::rejection::JsonRejection;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

/// Header the browser client sets after login.
pub const USER_ID_HEADER: &str = "user-id";

/// The authenticated caller, taken verbatim from the `user-id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("user not authenticated".into()))?;

        raw.parse()
            .map(CallerId)
            .map_err(|_| ApiError::Unauthorized(format!("invalid user id '{raw}'")))
    }
}

/// Turn a JSON extraction failure into a 400 with a JSON body.
pub fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("invalid request data: {}", rejection.body_text()))
}
