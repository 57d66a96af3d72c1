//! # speechgate-auth
//!
//! Stateless bearer token authentication for the Speechgate relay.
//!
//! A client exchanges the shared password for a token, then presents that
//! token on every protected call. Tokens are self-contained: an expiry
//! timestamp signed with HMAC-SHA256 under the shared secret. The server
//! keeps no sessions, so there is nothing to revoke and nothing to store.
//!
//! ## Modules
//!
//! - [`config`] - Password and token lifetime configuration
//! - [`token`] - Token issuance and verification
//! - [`middleware`] - The `BearerAuth` extractor guarding protected routes
//! - [`http`] - Axum handlers for login and token verification
//! - [`error`] - Error types and their HTTP responses

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod token;

pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use http::{LoginRequest, LoginResponse, VerifyResponse, auth_routes, login_handler, verify_handler};
pub use middleware::{AuthState, BearerAuth, extract_bearer};
pub use token::{SharedSecret, TokenRejection, TokenService};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
