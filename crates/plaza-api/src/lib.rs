pub mod accounts;
pub mod auth;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod routes;
pub mod token;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
pub use token::TokenKeys;
