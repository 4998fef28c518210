use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use plaza_types::api::{CreatePostRequest, ListPostsQuery, RemovePostRequest, UpdatePostRequest};
use plaza_types::models::PostResponse;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::Identity;

pub async fn create_post(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(req), _): WithRejection<Json<CreatePostRequest>, ApiError>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = blocking(&state, move |s| s.posts().create(&identity.account_id, req)).await?;
    Ok(Json(post))
}

pub async fn list_posts(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = blocking(&state, move |s| s.posts().list(&identity.account_id, query.account_id)).await?;
    Ok(Json(posts))
}

pub async fn update_post(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePostRequest>, ApiError>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = blocking(&state, move |s| s.posts().update(&identity.account_id, req)).await?;
    Ok(Json(post))
}

pub async fn remove_post(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(req), _): WithRejection<Json<RemovePostRequest>, ApiError>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = blocking(&state, move |s| s.posts().remove(&identity.account_id, req)).await?;
    Ok(Json(post))
}
