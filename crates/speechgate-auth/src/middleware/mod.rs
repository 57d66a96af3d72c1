//! HTTP middleware for authentication.
//!
//! - Bearer token extraction and validation ([`BearerAuth`])
//! - Uniform 401 responses for every kind of token failure

pub mod auth;
pub mod error;

pub use auth::{AuthState, BearerAuth, extract_bearer};
