//! The process-wide shared secret.
//!
//! A single value acts as both the login password and the HMAC key that
//! signs every token. It is built once from configuration and handed to the
//! token functions explicitly.

use std::fmt;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Password the server falls back to when none is configured.
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Opaque secret bytes, immutable for the lifetime of the process.
///
/// Cloning is cheap. The `Debug` output never contains the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(Arc<[u8]>);

impl SharedSecret {
    /// Wraps raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true when no secret was configured at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when the secret is still the well-known default.
    pub fn is_insecure_default(&self) -> bool {
        self.as_bytes() == DEFAULT_PASSWORD.as_bytes()
    }

    /// Checks a login password against the secret.
    ///
    /// Both sides are reduced to HMAC tags and compared with
    /// [`Mac::verify_slice`], so the comparison time does not depend on
    /// where the first differing byte is. Empty candidates never match.
    pub fn matches(&self, candidate: &str) -> bool {
        if candidate.is_empty() || self.is_empty() {
            return false;
        }
        let expected = self.mac().chain_update(self.as_bytes()).finalize().into_bytes();
        self.mac()
            .chain_update(candidate.as_bytes())
            .verify_slice(&expected)
            .is_ok()
    }

    /// Starts an HMAC-SHA256 computation keyed by this secret.
    pub(crate) fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.as_bytes()).expect("HMAC can take key of any size")
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedSecret").field(&"[REDACTED]").finish()
    }
}

impl From<&str> for SharedSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for SharedSecret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SharedSecret::from("hunter2");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_matches_exact_password_only() {
        let secret = SharedSecret::from("changeme");
        assert!(secret.matches("changeme"));
        assert!(!secret.matches("changeme2"));
        assert!(!secret.matches("Changeme"));
        assert!(!secret.matches("change"));
        assert!(!secret.matches(""));
    }

    #[test]
    fn test_empty_secret_never_matches() {
        let secret = SharedSecret::new(Vec::new());
        assert!(secret.is_empty());
        assert!(!secret.matches(""));
        assert!(!secret.matches("anything"));
    }

    #[test]
    fn test_insecure_default_detection() {
        assert!(SharedSecret::from(DEFAULT_PASSWORD).is_insecure_default());
        assert!(!SharedSecret::from("a-real-password").is_insecure_default());
    }
}
