// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Livio - a Kick.com go-live notifier for Discord.
//!
//! This is the binary entry point for the Livio watcher.

mod doctor;
mod login;
mod serve;
mod shutdown;
mod status;

use clap::{Parser, Subcommand};

/// Livio - a Kick.com go-live notifier for Discord.
#[derive(Parser, Debug)]
#[command(name = "livio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the watcher and status gateway.
    Serve,
    /// Show the state of a running watcher.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Run diagnostic checks against the configured environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// One-time OAuth bootstrap: obtain a refresh token for the watcher.
    Login,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match livio_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            livio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        Some(Commands::Login) => login::run_login(&config).await,
        None => {
            println!("livio: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
