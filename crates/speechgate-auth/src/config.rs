//! Authentication configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::{DEFAULT_PASSWORD, DEFAULT_TOKEN_TTL, SharedSecret, TokenService};

/// Authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// password = "a long random passphrase"
/// token_ttl = "30days"
/// ```
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// The shared password. Doubles as the token signing key.
    #[serde(skip_serializing)]
    pub password: String,

    /// Lifetime of issued tokens.
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` if the password is empty
    /// - `ConfigError::InvalidValue` if the token TTL is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::Missing("auth.password".to_string()));
        }

        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "auth.token_ttl must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Non-fatal problems worth a startup warning.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.shared_secret().is_insecure_default() {
            warnings.push(format!(
                "Using default password \"{DEFAULT_PASSWORD}\"; set APP_PASSWORD or auth.password"
            ));
        }
        warnings
    }

    /// Builds the shared secret from the configured password.
    pub fn shared_secret(&self) -> SharedSecret {
        SharedSecret::from(self.password.as_str())
    }

    /// Builds the token service for this configuration.
    pub fn token_service(&self) -> TokenService {
        TokenService::new(self.shared_secret(), self.token_ttl)
    }
}
