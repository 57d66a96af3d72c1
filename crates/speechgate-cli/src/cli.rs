use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "speechgate")]
#[command(about = "Speechgate CLI: log in to a relay and synthesize speech")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and SPEECHGATE_URL env var)
    #[arg(short, long, global = true, env = "SPEECHGATE_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "SPEECHGATE_PROFILE", default_value = "default")]
    pub profile: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange the shared password for a token
    Login(LoginArgs),
    /// Logout (remove stored token)
    Logout,
    /// Show the stored token and its expiry
    Whoami,
    /// Ask the server whether the stored token is still accepted
    Verify,
    /// Check server health
    Status,
    /// Synthesize speech through the relay
    Speak(SpeakArgs),
    /// Issue or inspect tokens offline
    Token(TokenArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Shared password
    #[arg(long, env = "SPEECHGATE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(clap::Args)]
pub struct SpeakArgs {
    /// Voice id at the provider
    #[arg(long)]
    pub voice: String,
    /// Text to speak
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
    /// Read the text from a file (reads from stdin if neither --text nor --file is given)
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Where to write the decoded audio
    #[arg(short, long, default_value = "speech.mp3")]
    pub out: PathBuf,
    /// Also write the character alignment JSON here
    #[arg(long)]
    pub alignment: Option<PathBuf>,
    #[arg(long)]
    pub stability: Option<f64>,
    #[arg(long)]
    pub similarity_boost: Option<f64>,
    #[arg(long)]
    pub style: Option<f64>,
    #[arg(long)]
    pub use_speaker_boost: Option<bool>,
}

#[derive(clap::Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommands,
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Sign a token locally with the shared secret
    Issue(TokenIssueArgs),
    /// Decode a token and report whether it is valid
    Inspect(TokenInspectArgs),
}

#[derive(clap::Args)]
pub struct TokenIssueArgs {
    /// Shared secret (the server password)
    #[arg(long, env = "SPEECHGATE_PASSWORD", hide_env_values = true)]
    pub secret: String,
    /// Token lifetime, e.g. "30days" or "12h"
    #[arg(long, default_value = "30days", value_parser = humantime_serde::re::humantime::parse_duration)]
    pub ttl: Duration,
}

#[derive(clap::Args)]
pub struct TokenInspectArgs {
    /// Token to inspect (defaults to the stored token for the profile)
    pub token: Option<String>,
    /// Shared secret; without it only the expiry is decoded
    #[arg(long)]
    pub secret: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server)
    pub key: String,
    /// Value
    pub value: String,
}
