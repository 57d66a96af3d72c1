use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use speechgate_auth::{LoginResponse, VerifyResponse};

use crate::cli::SpeakArgs;

pub struct SpeechgateClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SpeechgateClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn login(&self, password: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "password": password }))
            .send()
            .await
            .context("Failed to connect to server")?;
        let body: LoginResponse = handle_response(resp).await?;
        Ok(body.token)
    }

    pub async fn verify(&self) -> Result<bool> {
        let resp = self
            .request(reqwest::Method::GET, "/api/auth/verify")
            .send()
            .await
            .context("Failed to connect to server")?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(false);
        }
        let body: VerifyResponse = handle_response(resp).await?;
        Ok(body.ok)
    }

    pub async fn generate(&self, text: &str, args: &SpeakArgs) -> Result<Value> {
        let mut body = json!({ "voiceId": args.voice, "text": text });
        let settings = [
            ("stability", args.stability.map(Value::from)),
            ("similarity_boost", args.similarity_boost.map(Value::from)),
            ("style", args.style.map(Value::from)),
            ("use_speaker_boost", args.use_speaker_boost.map(Value::from)),
        ];
        for (key, value) in settings {
            if let Some(value) = value {
                body[key] = value;
            }
        }

        let resp = self
            .request(reqwest::Method::POST, "/api/generate")
            .json(&body)
            .send()
            .await
            .context("Failed to connect to server")?;
        handle_response(resp).await
    }

    pub async fn health(&self) -> Result<(u16, String)> {
        let resp = self
            .http
            .get(self.url("/healthz"))
            .send()
            .await
            .context("Failed to connect to server")?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && let Some(message) = json.get("error").and_then(|v| v.as_str())
        {
            anyhow::bail!("HTTP {status}: {message}");
        }
        anyhow::bail!("HTTP {status}: {body}");
    }

    serde_json::from_str(&body).context("Failed to parse response JSON")
}
