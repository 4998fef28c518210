use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use rand_core::OsRng;
use tracing::{error, info};

use plaza_db::Database;
use plaza_types::api::{AuthRequest, TokenResponse};

use crate::controller::AccountController;
use crate::error::ApiError;
use crate::token::TokenKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub keys: TokenKeys,
    pub hasher: Argon2<'static>,
}

impl AppStateInner {
    pub fn new(db: Database, keys: TokenKeys) -> Self {
        Self {
            db,
            keys,
            hasher: Argon2::default(),
        }
    }

    pub fn accounts(&self) -> AccountController<'_> {
        AccountController::new(&self.db, &self.hasher)
    }

    pub fn posts(&self) -> crate::controller::PostController<'_> {
        crate::controller::PostController::new(&self.db)
    }

    /// Exchange credentials for a signed token.
    pub fn issue_token(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let account = self.accounts().authenticate(email, password)?;
        let token = self
            .keys
            .issue(&account.id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        info!("Issued token for account {}", account.id);
        Ok(token)
    }
}

/// Run blocking store work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
}

pub fn hash_password(hasher: &Argon2<'_>, password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// Exact, case-sensitive check of `password` against a stored PHC string.
pub fn verify_password(hasher: &Argon2<'_>, password: &str, stored: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ApiError::Internal(format!("stored password hash unreadable: {}", e)))?;
    Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
}

pub async fn create_token(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<AuthRequest>, ApiError>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = blocking(&state, move |s| s.issue_token(&req.email, &req.password)).await?;
    Ok(Json(TokenResponse { token }))
}
