//! Token service bound to the process configuration.
//!
//! Wraps the pure functions in [`super::signed`] with the shared secret and
//! TTL chosen at startup, and with the wall clock.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use speechgate_auth::token::{SharedSecret, TokenService};
//!
//! let service = TokenService::new(SharedSecret::from("s3cret"), Duration::from_secs(3600));
//! let token = service.issue_now();
//! assert!(service.verify_now(Some(&token)));
//! ```

use std::time::Duration;

use time::OffsetDateTime;

use super::secret::SharedSecret;
use super::signed::{self, TokenRejection};

/// Default token lifetime: 30 days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Issues and verifies tokens with a fixed secret and TTL.
///
/// Holds no mutable state, so one instance can be shared by any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: SharedSecret,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service.
    #[must_use]
    pub fn new(secret: SharedSecret, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// The shared secret used for signing and login checks.
    pub fn secret(&self) -> &SharedSecret {
        &self.secret
    }

    /// Lifetime given to newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token relative to an explicit instant.
    pub fn issue_at(&self, now_ms: i64) -> String {
        signed::issue(&self.secret, now_ms, self.ttl)
    }

    /// Issues a token valid for the configured TTL from now.
    pub fn issue_now(&self) -> String {
        self.issue_at(now_millis())
    }

    /// Validates a token against the current time.
    pub fn validate_now(&self, token: &str) -> Result<i64, TokenRejection> {
        signed::validate(token, &self.secret, now_millis())
    }

    /// Returns true if the token is valid right now.
    pub fn verify_now(&self, token: Option<&str>) -> bool {
        signed::verify(token, &self.secret, now_millis())
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
