use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Token saved by `speechgate login`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredCredentials {
    pub server: String,
    pub token: String,
}

impl StoredCredentials {
    /// Shortened token for display.
    pub fn preview(&self) -> String {
        token_preview(&self.token)
    }
}

pub fn token_preview(token: &str) -> String {
    if token.len() > 20 && token.is_ascii() {
        format!("{}...{}", &token[..8], &token[token.len() - 8..])
    } else {
        token.to_string()
    }
}

/// `~/.speechgate`. Only the save paths create it.
pub fn speechgate_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".speechgate"))
}

fn creds_path(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("credentials.{profile}.json"))
}

pub fn load_credentials(profile: &str) -> Result<Option<StoredCredentials>> {
    load_credentials_in(&speechgate_dir()?, profile)
}

pub fn save_credentials(profile: &str, creds: &StoredCredentials) -> Result<()> {
    save_credentials_in(&speechgate_dir()?, profile, creds)
}

pub fn remove_credentials(profile: &str) -> Result<bool> {
    remove_credentials_in(&speechgate_dir()?, profile)
}

pub(crate) fn load_credentials_in(dir: &Path, profile: &str) -> Result<Option<StoredCredentials>> {
    let path = creds_path(dir, profile);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let creds: StoredCredentials = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt credentials file {}", path.display()))?;
    Ok(Some(creds))
}

fn save_credentials_in(dir: &Path, profile: &str, creds: &StoredCredentials) -> Result<()> {
    fs::create_dir_all(dir)?;
    let content = serde_json::to_string_pretty(creds)?;
    fs::write(creds_path(dir, profile), content)?;
    Ok(())
}

fn remove_credentials_in(dir: &Path, profile: &str) -> Result<bool> {
    let path = creds_path(dir, profile);
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
