use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use speechgate_auth::BearerAuth;

use super::client::RelayClient;
use super::error::RelayError;
use super::types::SynthesisRequest;

/// `POST /api/generate`
///
/// Requires a valid bearer token. A body sent without a JSON content type is
/// handled like an empty one and ends in a 400 for the missing fields. Any
/// other body failure keeps the extractor's own status and message.
pub async fn generate_handler(
    _auth: BearerAuth,
    State(relay): State<Arc<RelayClient>>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Result<Json<Value>, RelayError> {
    let request = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => SynthesisRequest::default(),
        Err(rejection) => {
            let err = RelayError::from(rejection);
            tracing::warn!(status = %err.status_code(), error = %err, "Generate body rejected");
            return Err(err);
        }
    };
    let started = Instant::now();

    match relay.synthesize(&request).await {
        Ok(data) => {
            tracing::info!(
                elapsed_ms = %started.elapsed().as_millis(),
                "Synthesis relayed"
            );
            Ok(Json(data))
        }
        Err(err) => {
            tracing::error!(error = %err, "Generate error");
            Err(err)
        }
    }
}
