pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod relay;
pub mod server;

pub use config::{AppConfig, LoggingConfig, ServerConfig, UpstreamConfig, VoiceDefaults};
pub use observability::{apply_logging_level, init_tracing};
pub use relay::{RelayClient, RelayError};
pub use server::{AppState, ServerBuilder, SpeechgateServer, build_app};
