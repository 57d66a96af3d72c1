use anyhow::{Context, Result};
use colored::Colorize;
use speechgate_auth::token::{now_millis, peek_expiry};

use crate::auth::{self, StoredCredentials};
use crate::cli::LoginArgs;
use crate::client::SpeechgateClient;
use crate::commands::token::describe_expiry;
use crate::output::{print_error, print_field, print_success};

pub async fn login(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let password = args
        .password
        .as_deref()
        .context("--password is required (or set SPEECHGATE_PASSWORD)")?;

    let client = SpeechgateClient::new(server, None);
    let token = client.login(password).await?;

    let creds = StoredCredentials {
        server: server.to_string(),
        token,
    };
    auth::save_credentials(profile, &creds)?;
    print_success(&format!("Logged in to {}", server.cyan()));
    Ok(())
}

pub fn logout(profile: &str) -> Result<()> {
    if auth::remove_credentials(profile)? {
        print_success("Logged out (token removed)");
    } else {
        println!("No credentials found for profile \"{profile}\"");
    }
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    match auth::load_credentials(profile)? {
        Some(creds) => {
            print_field("Profile", profile);
            print_field("Server", creds.server.cyan());
            print_field("Token", creds.preview());
            if let Some(expires_at) = peek_expiry(&creds.token) {
                print_field("Expires", describe_expiry(expires_at, now_millis()));
            }
        }
        None => {
            print_error(&format!("Not logged in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}

pub async fn verify(server: &str, profile: &str) -> Result<()> {
    let creds = auth::load_credentials(profile)?
        .with_context(|| format!("Not logged in (profile: \"{profile}\")"))?;
    let client = SpeechgateClient::new(server, Some(creds.token));
    check_token(&client, server).await
}

/// Fails when the server no longer accepts the client's token.
async fn check_token(client: &SpeechgateClient, server: &str) -> Result<()> {
    if !client.verify().await? {
        anyhow::bail!("Token rejected by {server}; run `speechgate login` again");
    }
    print_success(&format!("Token accepted by {}", server.cyan()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn rejected_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/verify"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Unauthorized"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SpeechgateClient::new(&server.uri(), Some("stale.token".into()));
        let err = check_token(&client, &server.uri())
            .await
            .expect_err("rejection must fail the command");
        assert!(err.to_string().contains("Token rejected"));
    }

    #[tokio::test]
    async fn accepted_token_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/verify"))
            .and(header("authorization", "Bearer good.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = SpeechgateClient::new(&server.uri(), Some("good.token".into()));
        check_token(&client, &server.uri()).await.unwrap();
    }
}
