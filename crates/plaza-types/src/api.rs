use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patch::Patch;

// -- JWT Claims --

/// Claims carried by every bearer token. `sub` is the account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Accounts --

/// Missing keys default to empty strings so they surface as field
/// violations instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateAccountRequest {
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub username: Patch<String>,
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Posts --

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub id: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RemovePostRequest {
    #[validate(required(message = "is required"), length(min = 1, message = "must not be empty"))]
    pub id: Option<String>,
}

/// Query string of `GET /accounts/posts`. An empty `account_id` means the caller.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub account_id: Option<String>,
}
