//! Token generation and validation.
//!
//! This module provides:
//!
//! - [`SharedSecret`], the single configured secret
//! - [`issue`] / [`verify`] / [`validate`], pure functions over the secret and a timestamp
//! - [`TokenService`], the same operations bound to configuration and the wall clock

pub mod secret;
pub mod service;
pub mod signed;

pub use secret::{DEFAULT_PASSWORD, SharedSecret};
pub use service::{DEFAULT_TOKEN_TTL, TokenService, now_millis};
pub use signed::{TokenRejection, issue, peek_expiry, validate, verify};
