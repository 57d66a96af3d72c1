use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::{load_credentials_in, speechgate_dir};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct ProfileConfig {
    pub server: Option<String>,
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)?;
    let cfg: ConfigFile = toml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let all = load_all_from(&config_path(&speechgate_dir()?))?;
    Ok(all.get(profile).cloned().unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path(&speechgate_dir()?), profile, config)
}

fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    all.insert(profile.to_string(), config.clone());
    fs::write(path, toml::to_string_pretty(&all)?)?;
    Ok(())
}

pub fn resolve_server(cli_server: &Option<String>, profile: &str) -> Result<String> {
    resolve_server_in(&speechgate_dir()?, cli_server, profile)
}

fn resolve_server_in(dir: &Path, cli_server: &Option<String>, profile: &str) -> Result<String> {
    // 1. --server flag / SPEECHGATE_URL env
    if let Some(s) = cli_server {
        return Ok(s.trim_end_matches('/').to_string());
    }
    // 2. config.toml profile
    let all = load_all_from(&config_path(dir))?;
    if let Some(s) = all.get(profile).and_then(|cfg| cfg.server.as_deref()) {
        return Ok(s.trim_end_matches('/').to_string());
    }
    // 3. Stored credentials for this profile
    if let Some(creds) = load_credentials_in(dir, profile)? {
        return Ok(creds.server);
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set SPEECHGATE_URL env var, or run: speechgate config set server <url>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_kept_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let local = ProfileConfig {
            server: Some("http://localhost:3000".into()),
        };
        let prod = ProfileConfig {
            server: Some("https://tts.example.com".into()),
        };
        save_profile_to(&path, "default", &local).unwrap();
        save_profile_to(&path, "prod", &prod).unwrap();

        let all = load_all_from(&path).unwrap();
        assert_eq!(all.get("default"), Some(&local));
        assert_eq!(all.get("prod"), Some(&prod));
    }

    #[test]
    fn explicit_server_wins_and_is_trimmed() {
        let server = resolve_server(&Some("http://localhost:3000/".into()), "unused").unwrap();
        assert_eq!(server, "http://localhost:3000");
    }

    #[test]
    fn profile_server_beats_stored_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let profile = ProfileConfig {
            server: Some("https://tts.example.com/".into()),
        };
        save_profile_to(&config_path(dir.path()), "default", &profile).unwrap();
        fs::write(
            dir.path().join("credentials.default.json"),
            r#"{"server":"http://localhost:3000","token":"a.b"}"#,
        )
        .unwrap();

        let server = resolve_server_in(dir.path(), &None, "default").unwrap();
        assert_eq!(server, "https://tts.example.com");
    }

    #[test]
    fn falls_back_to_stored_credentials() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("credentials.default.json"),
            r#"{"server":"http://localhost:3000","token":"a.b"}"#,
        )
        .unwrap();

        let server = resolve_server_in(dir.path(), &None, "default").unwrap();
        assert_eq!(server, "http://localhost:3000");
    }

    #[test]
    fn corrupt_credentials_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("credentials.default.json"), "not json").unwrap();

        let err = resolve_server_in(dir.path(), &None, "default").unwrap_err();
        assert!(format!("{err:#}").contains("Corrupt credentials file"));
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_server_in(dir.path(), &None, "default").unwrap_err();
        assert!(err.to_string().contains("No server URL configured"));
        assert!(dir.path().read_dir().unwrap().next().is_none());
    }
}
