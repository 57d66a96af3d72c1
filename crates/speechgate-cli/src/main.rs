mod auth;
mod cli;
mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, TokenCommands};
use client::SpeechgateClient;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            commands::auth::login(&server, args, profile).await?;
        }
        Commands::Logout => {
            commands::auth::logout(profile)?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Verify => {
            let server = config::resolve_server(&cli.server, profile)?;
            commands::auth::verify(&server, profile).await?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(set_args.value.clone()),
                    other => anyhow::bail!("Unknown config key: {other}. Valid keys: server"),
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Status => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = SpeechgateClient::new(&server, None);
            commands::server::status(&client, &server).await?;
        }
        Commands::Speak(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            let client = make_client(&server, profile)?;
            commands::speak::speak(&client, args).await?;
        }
        Commands::Token(args) => match &args.command {
            TokenCommands::Issue(issue_args) => commands::token::issue(issue_args)?,
            TokenCommands::Inspect(inspect_args) => {
                commands::token::inspect(inspect_args, profile)?
            }
        },
    }

    Ok(())
}

fn make_client(server: &str, profile: &str) -> Result<SpeechgateClient> {
    let token = auth::load_credentials(profile)?.map(|c| c.token);
    if token.is_none() {
        anyhow::bail!("Not logged in (profile: \"{profile}\"). Run: speechgate login");
    }
    Ok(SpeechgateClient::new(server, token))
}
