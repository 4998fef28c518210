//! Business rules between the HTTP handlers and the repositories.
//!
//! Controllers validate input, enforce ownership and uniqueness, and turn
//! missing rows into typed errors. They are synchronous and expect to run on
//! a blocking thread.

mod accounts;
mod posts;

pub use accounts::AccountController;
pub use posts::PostController;
