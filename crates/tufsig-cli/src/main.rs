//! # tufsig CLI entry point
//!
//! Parses command-line arguments, loads the environment configuration,
//! populates the algorithm registry and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tufsig_cli::algorithms::{run_algorithms, AlgorithmsArgs};
use tufsig_cli::config::CliConfig;
use tufsig_cli::keys::{run_inspect, run_keygen, InspectArgs, KeygenArgs};
use tufsig_cli::signing::{run_sign, run_verify, SignArgs, VerifyArgs};
use tufsig_crypto::registry;

/// tufsig: sign and verify files with Ed25519 and ECDSA keys.
#[derive(Parser, Debug)]
#[command(name = "tufsig", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered signature algorithms.
    Algorithms(AlgorithmsArgs),

    /// Generate a key pair as private and public key record files.
    Keygen(KeygenArgs),

    /// Decode a key record file and describe it.
    Inspect(InspectArgs),

    /// Sign a file and print the hex signature.
    Sign(SignArgs),

    /// Verify a hex signature over a file (exit 0 if valid, 1 if not).
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tufsig starting");

    let registry = registry::install_builtin();

    let result = match cli.command {
        Commands::Algorithms(args) => run_algorithms(&args, registry),
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Sign(args) => run_sign(&args, registry, &config),
        Commands::Verify(args) => run_verify(&args, registry, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
