//! Error response handling for authentication.
//!
//! This module implements `IntoResponse` for `AuthError`. Bodies are plain
//! `{"error": "..."}` objects so browser clients can show them directly.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = if self.is_unauthorized() {
            StatusCode::UNAUTHORIZED
        } else if matches!(self, AuthError::PayloadTooLarge) {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": self.to_string() }));
        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}
