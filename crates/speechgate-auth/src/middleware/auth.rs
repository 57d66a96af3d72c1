//! Bearer token authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post};
//! use speechgate_auth::middleware::{AuthState, BearerAuth};
//!
//! async fn protected_handler(_auth: BearerAuth) -> &'static str {
//!     "allowed"
//! }
//!
//! let app = Router::new()
//!     .route("/api/generate", post(protected_handler))
//!     .with_state(auth_state);
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::token::TokenService;

// =============================================================================
// Auth State
// =============================================================================

/// State required for bearer token authentication.
///
/// Include it in the application state and expose it to the extractor via
/// `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Token service holding the shared secret and TTL.
    pub tokens: TokenService,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

// =============================================================================
// Bearer Auth Extractor
// =============================================================================

/// Axum extractor that admits only requests carrying a valid token.
///
/// The token is read from the `Authorization` header. A literal `Bearer `
/// prefix is stripped if present; otherwise the whole header value is taken
/// as the token. Every failure produces the same [`AuthError::Unauthorized`].
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth {
    /// Expiry of the presented token, in epoch milliseconds.
    pub expires_at: i64,
}

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let Some(token) = extract_bearer(&parts.headers) else {
            tracing::debug!(path = %parts.uri.path(), "No bearer token");
            return Err(AuthError::Unauthorized);
        };

        match auth_state.tokens.validate_now(token) {
            Ok(expires_at) => Ok(BearerAuth { expires_at }),
            Err(reason) => {
                tracing::debug!(path = %parts.uri.path(), %reason, "Bearer token rejected");
                Err(AuthError::Unauthorized)
            }
        }
    }
}

/// Pulls the token out of the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid ASCII, or empty
/// after removing the `Bearer ` prefix.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    (!token.is_empty()).then_some(token)
}
