use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use humantime_serde::re::humantime;
use speechgate_auth::token::{self, SharedSecret, TokenRejection, now_millis};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::auth;
use crate::cli::{TokenInspectArgs, TokenIssueArgs};
use crate::output::{print_error, print_field, print_success};

pub fn issue(args: &TokenIssueArgs) -> Result<()> {
    if args.secret.is_empty() {
        anyhow::bail!("--secret must not be empty");
    }
    let secret = SharedSecret::from(args.secret.as_str());
    let now = now_millis();
    let token = token::issue(&secret, now, args.ttl);
    println!("{token}");
    eprintln!(
        "{}: {}",
        "Expires".cyan(),
        describe_expiry(now.saturating_add(ttl_millis(args.ttl)), now)
    );
    Ok(())
}

pub fn inspect(args: &TokenInspectArgs, profile: &str) -> Result<()> {
    let raw = match &args.token {
        Some(t) => t.clone(),
        None => {
            auth::load_credentials(profile)?
                .with_context(|| format!("No token given and not logged in (profile: \"{profile}\")"))?
                .token
        }
    };

    let now = now_millis();
    match token::peek_expiry(&raw) {
        Some(expires_at) => print_field("Expires", describe_expiry(expires_at, now)),
        None => print_field("Expires", "(undecodable)"),
    }

    match &args.secret {
        Some(secret) => match token::validate(&raw, &SharedSecret::from(secret.as_str()), now) {
            Ok(_) => print_success("Token is valid"),
            Err(reason) => print_error(&format!("Token is invalid: {}", rejection_hint(&reason))),
        },
        None => println!("Signature not checked (pass --secret to verify it)"),
    }
    Ok(())
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

fn rejection_hint(reason: &TokenRejection) -> String {
    match reason {
        TokenRejection::Malformed => "malformed".to_string(),
        TokenRejection::SignatureMismatch => "signature does not match this secret".to_string(),
        TokenRejection::Expired => "expired".to_string(),
    }
}

/// Formats an expiry as RFC 3339 plus the time left or elapsed.
pub fn describe_expiry(expires_at: i64, now_ms: i64) -> String {
    let when = OffsetDateTime::from_unix_timestamp_nanos(i128::from(expires_at) * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{expires_at} ms"));

    let delta = expires_at.saturating_sub(now_ms);
    let span = humantime::format_duration(Duration::from_secs(delta.unsigned_abs() / 1000));
    if delta > 0 {
        format!("{when} (in {span})")
    } else {
        format!("{when} (expired {span} ago)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_future_expiry() {
        let text = describe_expiry(1_702_592_000_000, 1_702_592_000_000 - 90_000);
        assert_eq!(text, "2023-12-14T22:13:20Z (in 1m 30s)");
    }

    #[test]
    fn describes_past_expiry() {
        let text = describe_expiry(1_702_592_000_000, 1_702_592_000_000 + 3_600_000);
        assert_eq!(text, "2023-12-14T22:13:20Z (expired 1h ago)");
    }

    #[test]
    fn out_of_range_expiry_falls_back_to_millis() {
        let text = describe_expiry(i64::MAX, 0);
        assert!(text.starts_with(&format!("{} ms", i64::MAX)));
    }

    #[test]
    fn ttl_saturates() {
        assert_eq!(ttl_millis(Duration::MAX), i64::MAX);
        assert_eq!(ttl_millis(Duration::from_secs(2)), 2000);
    }
}
