//! Relay-specific error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors from the synthesis relay.
///
/// None of these touch authentication state; they only describe the
/// forwarded call.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The client body lacks `voiceId` or `text`.
    #[error("voiceId and text are required")]
    MissingFields,

    /// The client body could not be read or decoded.
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    /// The server has no provider API key configured.
    #[error("ELEVEN_API_KEY not set in environment variables")]
    MissingApiKey,

    /// The configured upstream URL cannot be used.
    #[error("Invalid upstream configuration: {0}")]
    InvalidConfig(String),

    /// The provider answered with a non-success status.
    #[error("ElevenLabs API Error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// The provider did not answer within the configured timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// The provider could not be reached.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The provider answered 2xx with a body that is not JSON.
    #[error("Upstream returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
            Self::MissingApiKey | Self::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Transport(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
