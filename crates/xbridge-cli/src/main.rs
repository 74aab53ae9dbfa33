//! # xbridge CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use xbridge_cli::encode::{run_encode, EncodeArgs};
use xbridge_cli::inspect::{run_inspect, InspectArgs};
use xbridge_cli::load_config;
use xbridge_cli::replay::{run_replay, ReplayArgs};

/// Cross-chain bucket bridge tooling.
///
/// Decodes and builds bucket channel envelopes, and replays package
/// sequences through the bucket application.
#[derive(Parser, Debug)]
#[command(name = "xbridge", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the bridge configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an envelope and print the package as JSON.
    Inspect(InspectArgs),

    /// Build envelope hex for a sample package.
    Encode(EncodeArgs),

    /// Run a script of packages through the bucket application.
    Replay(ReplayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        tracing::debug!(
            channel = %config.channel_id,
            v2_height = ?config.upgrade.v2_height,
            "loaded bridge config"
        );
        match &cli.command {
            Commands::Inspect(args) => run_inspect(args, &config),
            Commands::Encode(args) => run_encode(args),
            Commands::Replay(args) => run_replay(args, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
