//! Login endpoint handler.
//!
//! Exchanges the shared password for a bearer token.
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {"password": "changeme"}
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AuthResult;
use crate::error::AuthError;
use crate::middleware::AuthState;

/// Login request body.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    /// The shared password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Freshly issued bearer token.
    pub token: String,
}

/// `POST /api/auth/login`
///
/// A missing or unreadable body is treated like a missing password. A body
/// over the size limit is rejected with 413.
pub async fn login_handler(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>> {
    let request = match payload {
        Ok(Json(body)) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Login rejected: body too large");
            return Err(AuthError::PayloadTooLarge);
        }
        Err(_) => LoginRequest::default(),
    };
    let password = request.password.unwrap_or_default();

    if !state.tokens.secret().matches(&password) {
        warn!("Login rejected: invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.tokens.issue_now();
    info!(ttl = ?state.tokens.ttl(), "Token issued");
    Ok(Json(LoginResponse { token }))
}
