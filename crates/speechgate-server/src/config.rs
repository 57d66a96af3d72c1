use serde::{Deserialize, Serialize};
use speechgate_auth::config::AuthConfig;
use std::{fmt, net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared password and token lifetime
    #[serde(default)]
    pub auth: AuthConfig,
    /// Speech synthesis provider
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        if self.server.shutdown_timeout.is_zero() {
            return Err("server.shutdown_timeout must be > 0".into());
        }
        // Auth validation
        self.auth
            .validate()
            .map_err(|e| format!("auth config error: {e}"))?;
        // Upstream validation
        let base = url::Url::parse(&self.upstream.base_url)
            .map_err(|e| format!("upstream.base_url is not a valid URL: {e}"))?;
        if base.cannot_be_a_base() {
            return Err("upstream.base_url must be an http(s) base URL".into());
        }
        if self.upstream.timeout.is_zero() {
            return Err("upstream.timeout must be > 0".into());
        }
        if self.upstream.model_id.is_empty() {
            return Err("upstream.model_id must not be empty".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Problems that do not stop the server but should be visible at boot.
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = self.auth.warnings();
        if !self.upstream.has_api_key() {
            warnings.push(
                "ELEVEN_API_KEY is not set; /api/generate will fail until it is configured"
                    .to_string(),
            );
        }
        warnings
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body. Synthesis texts can be long.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Directory served for every path that is not an API route.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// How long in-flight requests may drain after a shutdown signal.
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_body_limit() -> usize {
    50 * 1024 * 1024
}
fn default_static_dir() -> String {
    "public".into()
}
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            static_dir: default_static_dir(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

/// Upstream text-to-speech provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider base URL; the synthesis path is appended to it.
    pub base_url: String,
    /// Provider API key, sent as `xi-api-key`. Never exposed to clients.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model requested for every synthesis.
    pub model_id: String,
    /// Per-request timeout for the upstream call.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Voice settings used when the client omits them.
    pub voice_defaults: VoiceDefaults,
}

impl UpstreamConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            api_key: None,
            model_id: "eleven_v3".into(),
            timeout: Duration::from_secs(120),
            voice_defaults: VoiceDefaults::default(),
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model_id", &self.model_id)
            .field("timeout", &self.timeout)
            .field("voice_defaults", &self.voice_defaults)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceDefaults {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
}

impl Default for VoiceDefaults {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Default configuration file, looked up in the working directory.
    pub const DEFAULT_CONFIG_PATH: &str = "speechgate.toml";

    /// Unprefixed variables from the single-process deployment and the keys they set.
    pub const LEGACY_ENV_VARS: [(&str, &str); 3] = [
        ("APP_PASSWORD", "auth.password"),
        ("ELEVEN_API_KEY", "upstream.api_key"),
        ("PORT", "server.port"),
    ];

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        load_config_with_env(path, std::env::vars().collect())
    }

    /// Same as [`load_config`] with `env` standing in for the process environment.
    ///
    /// Precedence, lowest first: defaults, the TOML file,
    /// `SPEECHGATE__SECTION__KEY` variables, legacy variables.
    pub fn load_config_with_env(
        path: Option<&str>,
        env: HashMap<String, String>,
    ) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., SPEECHGATE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("SPEECHGATE")
                .try_parsing(true)
                .separator("__")
                .source(Some(env.clone().into_iter().collect())),
        );
        for (var, key) in LEGACY_ENV_VARS {
            let value = env.get(var).filter(|v| !v.is_empty()).cloned();
            builder = builder
                .set_override_option(key, value)
                .map_err(|e| format!("config override error for {var}: {e}"))?;
        }
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}
