use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use plaza_db::{DbError, UniqueField};
use plaza_types::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    // 400
    #[error("validation failed")]
    ValidationFailed(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),

    // 401
    #[error("password does not match")]
    UnauthorizedPassword,
    #[error("Token Invalid")]
    UnauthorizedToken,
    #[error("post belongs to another account")]
    UnauthorizedAccountId,

    // 404
    #[error("email not found")]
    NotFoundEmail,
    #[error("account not found")]
    NotFoundAccountId,
    #[error("post not found")]
    NotFoundPostId,

    // 409
    #[error("username already in use")]
    ConflictUsername,
    #[error("email already in use")]
    ConflictEmail,

    // 500
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationFailed(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnauthorizedPassword
            | ApiError::UnauthorizedToken
            | ApiError::UnauthorizedAccountId => StatusCode::UNAUTHORIZED,
            ApiError::NotFoundEmail | ApiError::NotFoundAccountId | ApiError::NotFoundPostId => {
                StatusCode::NOT_FOUND
            }
            ApiError::ConflictUsername | ApiError::ConflictEmail => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(UniqueField::Username) => ApiError::ConflictUsername,
            DbError::Conflict(UniqueField::Email) => ApiError::ConflictEmail,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::ValidationFailed(errors) => {
                debug!("Rejected request: {} field error(s)", errors.len());
                json!({ "message": self.to_string(), "errors": errors })
            }
            ApiError::Internal(detail) => {
                // Log the real error but return generic message
                error!("Internal error: {}", detail);
                json!({ "message": "internal server error" })
            }
            _ => {
                debug!("Rejected request: {}", self);
                json!({ "message": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflicts_become_typed_errors() {
        assert!(matches!(
            ApiError::from(DbError::Conflict(UniqueField::Username)),
            ApiError::ConflictUsername
        ));
        assert!(matches!(
            ApiError::from(DbError::Conflict(UniqueField::Email)),
            ApiError::ConflictEmail
        ));
        assert!(matches!(ApiError::from(DbError::Poisoned), ApiError::Internal(_)));
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::ValidationFailed(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnauthorizedAccountId.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFoundPostId.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ConflictEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
