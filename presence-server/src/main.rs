use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use presence_server::configs::Settings;
use presence_server::run;
use presence_server::services::hash_password;

#[derive(Parser)]
#[command(version, about = "Geofence presence register")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print an argon2 hash to use as a password in `[[auth.users]]`
    HashPassword {
        /// Read from stdin when omitted
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = cli.command {
        return print_hash(password);
    }

    let settings = match Settings::new() {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            tracing_subscriber::fmt().init();
            tracing::error!("failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level},tower_http={level}").into()
        }))
        .init();

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("server stopped: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_hash(password: Option<String>) -> ExitCode {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().read_line(&mut line) {
                tracing_subscriber::fmt().init();
                tracing::error!("failed to read password: {}", e);
                return ExitCode::FAILURE;
            }
            line
        }
    };

    match hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing_subscriber::fmt().init();
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
