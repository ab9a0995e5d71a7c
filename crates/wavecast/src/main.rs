// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wavecast - WhatsApp bulk-campaign dispatcher.
//!
//! This is the binary entry point for the Wavecast service.

mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Wavecast - WhatsApp bulk-campaign dispatcher.
#[derive(Parser, Debug)]
#[command(name = "wavecast", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the dispatch service and HTTP gateway.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match wavecast_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            wavecast_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("wavecast: failed to render config: {err}");
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            if let Err(err) = serve::run(config).await {
                tracing::error!(error = %err, "wavecast serve failed");
                std::process::exit(1);
            }
        }
    }
}

/// Initialize the tracing subscriber once, honoring `RUST_LOG` when set and
/// the configured level otherwise.
fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config =
            wavecast_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.service.name, "wavecast");
        assert_eq!(config.campaign.min_delay_ms, 6000);
    }
}
