//! Relay to the upstream speech synthesis provider.
//!
//! The provider API key lives only in server configuration. Authenticated
//! clients send a voice id and text; the relay adds the key, forwards the
//! request and returns the provider's JSON (audio plus timestamps) as-is.

pub mod client;
pub mod error;
pub mod handler;
pub mod types;

pub use client::RelayClient;
pub use error::RelayError;
pub use handler::generate_handler;
pub use types::{SynthesisRequest, UpstreamPayload, VoiceSettings};
