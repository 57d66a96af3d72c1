//! HTTP client for the upstream synthesis provider.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::RelayError;
use super::types::{SynthesisRequest, UpstreamPayload};
use crate::config::UpstreamConfig;

/// Header carrying the provider API key.
const API_KEY_HEADER: &str = "xi-api-key";

/// Forwards synthesis requests to the provider with the server-held API key.
///
/// Each call is bounded by the configured timeout. Dropping the returned
/// future cancels the outbound request.
pub struct RelayClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl RelayClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("speechgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::InvalidConfig(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Builds `{base_url}/v1/text-to-speech/{voice_id}/with-timestamps`.
    ///
    /// The voice id is percent-encoded as a single path segment.
    pub fn synthesis_url(&self, voice_id: &str) -> Result<Url, RelayError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| RelayError::InvalidConfig(format!("base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RelayError::InvalidConfig("base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id, "with-timestamps"]);
        Ok(url)
    }

    /// Sends one synthesis request and returns the provider's JSON unchanged.
    #[instrument(skip_all, fields(voice_id))]
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Value, RelayError> {
        let (voice_id, text) = request.required_fields().ok_or(RelayError::MissingFields)?;
        tracing::Span::current().record("voice_id", voice_id);

        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RelayError::MissingApiKey)?;

        let url = self.synthesis_url(voice_id)?;
        let payload = UpstreamPayload {
            text,
            model_id: &self.config.model_id,
            voice_settings: request.voice_settings(&self.config.voice_defaults),
        };

        info!(
            text_chars = text.chars().count(),
            timeout_secs = self.config.timeout.as_secs(),
            "Relaying synthesis request"
        );

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&payload)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Upstream rejected synthesis request");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        debug!(status = %status, "Upstream synthesis completed");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RelayClient {
        RelayClient::new(UpstreamConfig {
            base_url: base_url.into(),
            api_key: Some("key".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_synthesis_url() {
        let url = client("https://api.elevenlabs.io")
            .synthesis_url("21m00Tcm4TlvDq8ikWAM")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.elevenlabs.io/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM/with-timestamps"
        );
    }

    #[test]
    fn test_synthesis_url_with_base_path_and_trailing_slash() {
        let url = client("http://localhost:9000/proxy/")
            .synthesis_url("abc")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/proxy/v1/text-to-speech/abc/with-timestamps"
        );
    }

    #[test]
    fn test_voice_id_cannot_escape_its_segment() {
        let url = client("https://api.elevenlabs.io")
            .synthesis_url("../admin?x=1")
            .unwrap();
        assert_eq!(
            url.path(),
            "/v1/text-to-speech/..%2Fadmin%3Fx=1/with-timestamps"
        );
        assert!(url.query().is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_checked_before_api_key() {
        let relay = RelayClient::new(UpstreamConfig::default()).unwrap();
        let err = relay
            .synthesize(&SynthesisRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingFields));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let relay = RelayClient::new(UpstreamConfig::default()).unwrap();
        let request = SynthesisRequest {
            voice_id: Some("v".into()),
            text: Some("hi".into()),
            ..Default::default()
        };
        let err = relay.synthesize(&request).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingApiKey));
    }
}
