//! Token verification endpoint.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;
use crate::middleware::{AuthState, extract_bearer};

/// Body returned for a valid token.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Always `true`; invalid tokens get a 401 instead.
    pub ok: bool,
}

/// `GET /api/auth/verify`
///
/// Answers whether the presented bearer token is currently valid. The
/// response does not say why a token was rejected.
pub async fn verify_handler(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> AuthResult<Json<VerifyResponse>> {
    if state.tokens.verify_now(extract_bearer(&headers)) {
        Ok(Json(VerifyResponse { ok: true }))
    } else {
        Err(AuthError::InvalidToken)
    }
}
