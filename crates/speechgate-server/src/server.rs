use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use speechgate_auth::{AuthState, auth_routes};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::AppConfig,
    handlers, middleware as app_middleware,
    relay::{RelayClient, generate_handler},
};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub relay: Arc<RelayClient>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let relay = RelayClient::new(cfg.upstream.clone())?;
        Ok(Self {
            auth: AuthState::new(cfg.auth.token_service()),
            relay: Arc::new(relay),
        })
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<RelayClient> {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}

pub struct SpeechgateServer {
    addr: SocketAddr,
    app: Router,
    shutdown_timeout: Duration,
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz))
        // Password login and token check
        .merge(auth_routes::<AppState>())
        // Protected relay
        .route("/api/generate", post(generate_handler))
        // Everything else is the static web client
        .fallback_service(ServeDir::new(&cfg.server.static_dir))
        .with_state(state)
        // Middleware stack, innermost first: trace span, then request id around it
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<SpeechgateServer> {
        let state = AppState::from_config(&self.config)?;
        let app = build_app(&self.config, state);

        Ok(SpeechgateServer {
            addr: self.addr,
            app,
            shutdown_timeout: self.config.server.shutdown_timeout,
        })
    }
}

impl SpeechgateServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        serve_with_drain(listener, self.app, shutdown_signal(), self.shutdown_timeout).await
    }
}

/// Serves `app` until `signal` resolves, then gives in-flight requests at
/// most `drain` to finish before returning.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, fired_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        signal.await;
        let _ = fired_tx.send(());
    };
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();
    tokio::pin!(serve);

    tokio::select! {
        res = &mut serve => res?,
        Ok(()) = fired_rx => {
            match tokio::time::timeout(drain, &mut serve).await {
                Ok(res) => res?,
                Err(_) => tracing::warn!(
                    drain_ms = %drain.as_millis(),
                    "shutdown drain timed out, dropping open connections"
                ),
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
