use axum::{
    extract::FromRequestParts,
    http::{HeaderName, request::Parts},
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;

/// Protected routes read the token from this header, not `Authorization`.
pub static BEARER_TOKEN: HeaderName = HeaderName::from_static("bearertoken");

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: String,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(&BEARER_TOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::UnauthorizedToken)?;

        let account_id = state.keys.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ApiError::UnauthorizedToken
        })?;

        Ok(Identity { account_id })
    }
}
