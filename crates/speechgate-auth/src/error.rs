//! Authentication error types.
//!
//! Token verification failures never reach this type with their cause
//! attached: malformed, forged and expired tokens all become
//! [`AuthError::Unauthorized`].

/// Errors produced at the authentication boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No valid bearer token was presented for a protected operation.
    #[error("Unauthorized")]
    Unauthorized,

    /// The login password did not match the shared secret.
    #[error("Invalid password")]
    InvalidCredentials,

    /// The token presented to the verify endpoint is not valid.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The request body exceeded the configured size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns true for errors that map to HTTP 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::InvalidCredentials | Self::InvalidToken
        )
    }
}
