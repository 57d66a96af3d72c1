use std::{collections::HashMap, fs, time::Duration};

use speechgate_server::config::loader::load_config_with_env;

fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("speechgate.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 1024
static_dir = "web"
shutdown_timeout = "5s"

[auth]
password = "from-file"
token_ttl = "7days"

[upstream]
base_url = "http://localhost:9999"
api_key = "file-key"
model_id = "eleven_multilingual_v2"
timeout = "30s"

[upstream.voice_defaults]
stability = 0.3

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config_with_env(path.to_str(), HashMap::new()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.server.static_dir, "web");
    assert_eq!(cfg.server.shutdown_timeout, Duration::from_secs(5));
    assert_eq!(cfg.auth.password, "from-file");
    assert_eq!(cfg.auth.token_ttl, Duration::from_secs(7 * 24 * 3600));
    assert_eq!(cfg.upstream.api_key.as_deref(), Some("file-key"));
    assert_eq!(cfg.upstream.model_id, "eleven_multilingual_v2");
    assert_eq!(cfg.upstream.timeout, Duration::from_secs(30));
    assert_eq!(cfg.upstream.voice_defaults.stability, 0.3);
    assert_eq!(cfg.upstream.voice_defaults.similarity_boost, 0.75);
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override should win over file
    let env = env_of(&[
        ("SPEECHGATE__UPSTREAM__MODEL_ID", "eleven_turbo_v2"),
        ("SPEECHGATE__SERVER__SHUTDOWN_TIMEOUT", "2s"),
    ]);
    let cfg_env =
        load_config_with_env(path.to_str(), env).expect("should parse config with env overrides");
    assert_eq!(cfg_env.upstream.model_id, "eleven_turbo_v2");
    assert_eq!(cfg_env.server.shutdown_timeout, Duration::from_secs(2));

    // 3) Invalid config should error
    let invalid_path = dir.path().join("invalid.toml");
    fs::write(&invalid_path, "[auth]\ntoken_ttl = \"0s\"\n").expect("write invalid toml");
    let err = load_config_with_env(invalid_path.to_str(), HashMap::new())
        .expect_err("expected validation error");
    assert!(err.contains("token_ttl"));
}

#[test]
fn zero_shutdown_timeout_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("speechgate.toml");
    fs::write(&path, "[server]\nshutdown_timeout = \"0s\"\n").expect("write toml");

    let err = load_config_with_env(path.to_str(), HashMap::new())
        .expect_err("expected validation error");
    assert!(err.contains("shutdown_timeout"));
}

#[test]
fn legacy_environment_variables_override_file() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("speechgate.toml");
    fs::write(
        &path,
        "[server]\nport = 8081\n\n[auth]\npassword = \"from-file\"\n",
    )
    .expect("write toml");

    let env = env_of(&[
        ("APP_PASSWORD", "from-env"),
        ("ELEVEN_API_KEY", "env-key"),
        ("PORT", "9090"),
    ]);
    let cfg = load_config_with_env(path.to_str(), env).expect("should parse config");

    assert_eq!(cfg.auth.password, "from-env");
    assert_eq!(cfg.upstream.api_key.as_deref(), Some("env-key"));
    assert_eq!(cfg.server.port, 9090);
    assert!(cfg.startup_warnings().is_empty());
}

#[test]
fn legacy_variables_beat_prefixed_ones() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("missing.toml");

    let env = env_of(&[
        ("SPEECHGATE__SERVER__PORT", "7070"),
        ("PORT", "9090"),
    ]);
    let cfg = load_config_with_env(path.to_str(), env).expect("should parse config");
    assert_eq!(cfg.server.port, 9090);
}

#[test]
fn empty_legacy_variables_are_ignored() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("speechgate.toml");
    fs::write(&path, "[auth]\npassword = \"from-file\"\n").expect("write toml");

    let cfg = load_config_with_env(path.to_str(), env_of(&[("APP_PASSWORD", "")]))
        .expect("should parse config");
    assert_eq!(cfg.auth.password, "from-file");
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("does-not-exist.toml");

    let cfg = load_config_with_env(path.to_str(), HashMap::new()).expect("defaults are valid");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.shutdown_timeout, Duration::from_secs(10));
    assert_eq!(cfg.auth.password, "changeme");
    assert_eq!(cfg.auth.token_ttl, Duration::from_secs(30 * 24 * 3600));
    assert_eq!(cfg.upstream.base_url, "https://api.elevenlabs.io");
    assert!(cfg.upstream.api_key.is_none());
    assert_eq!(cfg.startup_warnings().len(), 2);
}

#[test]
fn invalid_port_from_legacy_variable_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("speechgate.toml");

    let result = load_config_with_env(path.to_str(), env_of(&[("PORT", "not-a-port")]));
    assert!(result.is_err());
}
