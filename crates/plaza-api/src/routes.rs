use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::auth::{self, AppState};
use crate::{accounts, posts};

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// Every endpoint of the service. Protected handlers take an [`Identity`]
/// so `POST /accounts` can stay public on a shared path.
///
/// [`Identity`]: crate::middleware::Identity
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/accounts",
            post(accounts::create_account)
                .get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/accounts/auth", post(auth::create_token))
        .route("/accounts/posts", get(posts::list_posts))
        .route(
            "/posts",
            post(posts::create_post)
                .put(posts::update_post)
                .delete(posts::remove_post),
        )
        .with_state(state)
}
