//! Token issuance and verification.
//!
//! Wire format:
//!
//! ```text
//! base64(<expiry ms, decimal>) "." hex(HMAC-SHA256(secret, <expiry ms, decimal>))
//! ```
//!
//! The token carries nothing but its expiry, so every holder of a valid
//! token has the same access. Nothing is stored server side; a token dies
//! when the wall clock passes its expiry.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::Mac;

use super::secret::SharedSecret;

/// Length of a hex encoded HMAC-SHA256 tag.
const SIGNATURE_HEX_LEN: usize = 64;

/// Why a token was rejected.
///
/// Only for server-side logs and operator tooling. Callers at the HTTP
/// boundary must collapse every variant into the same unauthorized response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// Empty token, wrong segment count, bad base64, bad UTF-8 or a
    /// payload that is not a decimal integer.
    #[error("malformed token")]
    Malformed,

    /// The signature segment does not match the recomputed HMAC.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The signature is valid but the expiry instant has passed.
    #[error("token expired")]
    Expired,
}

/// Issues a token that expires `ttl` after `now_ms`.
///
/// `now_ms` is wall-clock time in milliseconds since the Unix epoch. The
/// secret is assumed to be non-empty; that is enforced by configuration.
pub fn issue(secret: &SharedSecret, now_ms: i64, ttl: Duration) -> String {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    let payload = now_ms.saturating_add(ttl_ms).to_string();
    let signature = sign(secret, &payload);
    format!("{}.{}", STANDARD.encode(payload.as_bytes()), signature)
}

/// Checks a token and returns its expiry (epoch milliseconds) on success.
///
/// Checks run in a fixed order and stop at the first failure: structure,
/// base64 payload, signature, integer payload, expiry. A token is valid
/// while `now_ms` is strictly before its expiry.
pub fn validate(token: &str, secret: &SharedSecret, now_ms: i64) -> Result<i64, TokenRejection> {
    if token.is_empty() {
        return Err(TokenRejection::Malformed);
    }

    let mut parts = token.split('.');
    let (encoded, signature) = match (parts.next(), parts.next(), parts.next()) {
        (Some(encoded), Some(signature), None) => (encoded, signature),
        _ => return Err(TokenRejection::Malformed),
    };

    let payload = decode_payload(encoded).ok_or(TokenRejection::Malformed)?;

    if !signature_matches(secret, &payload, signature) {
        return Err(TokenRejection::SignatureMismatch);
    }

    let expires_at: i64 = payload.parse().map_err(|_| TokenRejection::Malformed)?;
    if expires_at <= now_ms {
        return Err(TokenRejection::Expired);
    }

    Ok(expires_at)
}

/// Returns true if the token is intact, signed by `secret` and unexpired.
///
/// Never fails: an absent or malformed token is simply invalid.
pub fn verify(token: Option<&str>, secret: &SharedSecret, now_ms: i64) -> bool {
    token.is_some_and(|token| validate(token, secret, now_ms).is_ok())
}

/// Reads the expiry out of a token WITHOUT checking its signature.
///
/// For display only. Never base an access decision on this value.
pub fn peek_expiry(token: &str) -> Option<i64> {
    let (encoded, _) = token.split_once('.')?;
    decode_payload(encoded)?.parse().ok()
}

fn decode_payload(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

fn sign(secret: &SharedSecret, payload: &str) -> String {
    let tag = secret.mac().chain_update(payload.as_bytes()).finalize();
    hex::encode(tag.into_bytes())
}

/// Compares `signature` with the lowercase hex HMAC of `payload`.
///
/// The format check looks only at the supplied string. The tag comparison
/// itself is constant time.
fn signature_matches(secret: &SharedSecret, payload: &str, signature: &str) -> bool {
    let well_formed = signature.len() == SIGNATURE_HEX_LEN
        && signature
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !well_formed {
        return false;
    }

    let Ok(tag) = hex::decode(signature) else {
        return false;
    };

    secret
        .mac()
        .chain_update(payload.as_bytes())
        .verify_slice(&tag)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000_000;
    const THIRTY_DAYS: Duration = Duration::from_secs(30 * 24 * 60 * 60);
    const THIRTY_DAYS_MS: i64 = 30 * 24 * 60 * 60 * 1000;

    fn secret() -> SharedSecret {
        SharedSecret::from("changeme")
    }

    #[test]
    fn test_issue_matches_reference_wire_format() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        assert_eq!(
            token,
            "MTcwMjU5MjAwMDAwMA==.c5de702bc9e9573a36f0651593c340a56267ad08a8cea8a7b0c3136abdb6b202"
        );
    }

    #[test]
    fn test_payload_decodes_to_expiry() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        let (encoded, _) = token.split_once('.').unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "1702592000000");
        assert_eq!(peek_expiry(&token), Some(1_702_592_000_000));
    }

    #[test]
    fn test_round_trip_valid_for_whole_lifetime() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        assert!(verify(Some(&token), &secret(), T));
        assert!(verify(Some(&token), &secret(), T + 1));
        assert!(verify(Some(&token), &secret(), T + THIRTY_DAYS_MS / 2));
        assert!(verify(Some(&token), &secret(), T + THIRTY_DAYS_MS - 1));
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        assert!(verify(Some(&token), &secret(), T + THIRTY_DAYS_MS - 1));
        assert!(!verify(Some(&token), &secret(), T + THIRTY_DAYS_MS));
        assert_eq!(
            validate(&token, &secret(), T + THIRTY_DAYS_MS),
            Err(TokenRejection::Expired)
        );
        assert!(!verify(Some(&token), &secret(), T + THIRTY_DAYS_MS + 1));
    }

    #[test]
    fn test_validate_returns_expiry() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        assert_eq!(validate(&token, &secret(), T), Ok(T + THIRTY_DAYS_MS));
    }

    #[test]
    fn test_changeme_scenario() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        assert!(verify(Some(&token), &secret(), 1_700_000_000_001));
        assert!(!verify(Some(&token), &secret(), 1_702_592_000_000));
        assert!(!verify(Some("not-a-token"), &secret(), 1_700_000_000_001));
        assert!(!verify(
            Some(&token),
            &SharedSecret::from("changeme2"),
            1_700_000_000_001
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(&SharedSecret::from("alpha"), T, THIRTY_DAYS);
        assert_eq!(
            validate(&token, &SharedSecret::from("beta"), T),
            Err(TokenRejection::SignatureMismatch)
        );
        assert!(!verify(Some(&token), &SharedSecret::from("alph"), T));
        assert!(!verify(Some(&token), &SharedSecret::from("alpha "), T));
    }

    #[test]
    fn test_any_single_character_flip_is_rejected() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        let dot = token.find('.').unwrap();

        for (i, c) in token.char_indices() {
            if i == dot {
                continue;
            }
            let replacement = if i < dot {
                if c == 'A' { 'B' } else { 'A' }
            } else if c == '0' {
                '1'
            } else {
                '0'
            };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + 1, &replacement.to_string());
            assert!(
                !verify(Some(&tampered), &secret(), T),
                "flipping position {i} should invalidate the token"
            );
        }
    }

    #[test]
    fn test_uppercase_signature_rejected() {
        let token = issue(&secret(), T, THIRTY_DAYS);
        let (encoded, sig) = token.split_once('.').unwrap();
        let upper = format!("{encoded}.{}", sig.to_ascii_uppercase());
        assert_eq!(
            validate(&upper, &secret(), T),
            Err(TokenRejection::SignatureMismatch)
        );
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let s = secret();
        let token = issue(&s, T, THIRTY_DAYS);
        let (encoded, sig) = token.split_once('.').unwrap();

        assert!(!verify(None, &s, T));
        assert!(!verify(Some(""), &s, T));
        assert!(!verify(Some("no-separator-at-all"), &s, T));
        assert!(!verify(Some(&format!("{token}.extra")), &s, T));
        assert!(!verify(Some(&format!("{encoded}..{sig}")), &s, T));
        assert!(!verify(Some("."), &s, T));
        assert!(!verify(Some(&format!("!!not*base64!!.{sig}")), &s, T));

        assert_eq!(validate("", &s, T), Err(TokenRejection::Malformed));
        assert_eq!(
            validate(&format!("{token}.extra"), &s, T),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(
            validate(&format!("%%%.{sig}"), &s, T),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn test_signed_non_numeric_payload_is_malformed() {
        let s = secret();
        let payload = "12ab";
        let forged = format!("{}.{}", STANDARD.encode(payload), sign(&s, payload));
        assert_eq!(validate(&forged, &s, T), Err(TokenRejection::Malformed));
        assert!(!verify(Some(&forged), &s, T));
    }

    #[test]
    fn test_unsigned_non_numeric_payload_is_rejected() {
        let forged = format!("{}.{}", STANDARD.encode("abc"), "0".repeat(64));
        assert!(!verify(Some(&forged), &secret(), T));
    }

    #[test]
    fn test_invalid_utf8_payload_is_malformed() {
        let forged = format!("{}.{}", STANDARD.encode([0xff, 0xfe]), "0".repeat(64));
        assert_eq!(validate(&forged, &secret(), T), Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_zero_ttl_token_is_already_expired() {
        let token = issue(&secret(), T, Duration::ZERO);
        assert!(!verify(Some(&token), &secret(), T));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let token = issue(&secret(), T, Duration::MAX);
        assert_eq!(peek_expiry(&token), Some(i64::MAX));
        assert!(verify(Some(&token), &secret(), T));
    }

    #[test]
    fn test_peek_expiry_ignores_signature() {
        let forged = format!("{}.garbage", STANDARD.encode("42"));
        assert_eq!(peek_expiry(&forged), Some(42));
        assert_eq!(peek_expiry("nonsense"), None);
    }
}
