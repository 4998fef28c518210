use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;

use plaza_types::api::{CreateAccountRequest, UpdateAccountRequest};
use plaza_types::models::AccountResponse;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::Identity;

pub async fn create_account(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateAccountRequest>, ApiError>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = blocking(&state, move |s| s.accounts().create(req)).await?;
    Ok(Json(account.to_response()))
}

pub async fn get_account(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = blocking(&state, move |s| s.accounts().get(&identity.account_id)).await?;
    Ok(Json(account.to_response()))
}

pub async fn update_account(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(req), _): WithRejection<Json<UpdateAccountRequest>, ApiError>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = blocking(&state, move |s| s.accounts().update(&identity.account_id, req)).await?;
    Ok(Json(account.to_response()))
}

pub async fn delete_account(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = blocking(&state, move |s| s.accounts().delete(&identity.account_id)).await?;
    Ok(Json(account.to_response()))
}
