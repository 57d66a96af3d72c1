//! HTTP handlers for the authentication endpoints.
//!
//! # Available Handlers
//!
//! - [`login_handler`] - `POST /api/auth/login`, password for token
//! - [`verify_handler`] - `GET /api/auth/verify`, token check

pub mod login;
pub mod verify;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};

pub use login::{LoginRequest, LoginResponse, login_handler};
pub use verify::{VerifyResponse, verify_handler};

use crate::middleware::AuthState;

/// Routes for login and token verification, mounted at their full paths.
pub fn auth_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    AuthState: FromRef<S>,
{
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/verify", get(verify_handler))
}
