//! # Signing Subcommands
//!
//! `sign` and `verify` over the raw bytes of a file, with any algorithm in
//! the registry.
//!
//! The algorithm is chosen in this order: `--algorithm`, then
//! `TUFSIG_DEFAULT_ALGORITHM`, then the key record's `scheme`, then the
//! scheme conventionally paired with the decoded key type.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use tufsig_crypto::{
    Algorithm, Key, KeyRecord, KeyType, Registry, SignOptions, SignatureError, Signer, Verifier,
};

use crate::config::CliConfig;

/// Arguments for `tufsig sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Path to the private key record.
    #[arg(long)]
    pub key: PathBuf,
    /// Algorithm name (see `tufsig algorithms`).
    #[arg(long)]
    pub algorithm: Option<String>,
    /// File to sign.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for `tufsig verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the public (or private) key record.
    #[arg(long)]
    pub key: PathBuf,
    /// Algorithm name (see `tufsig algorithms`).
    #[arg(long)]
    pub algorithm: Option<String>,
    /// Hex-encoded signature.
    #[arg(long)]
    pub signature: String,
    /// File the signature covers.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Sign a file and print the hex signature.
pub fn run_sign(args: &SignArgs, registry: &Registry, config: &CliConfig) -> Result<u8> {
    let (record, key) = crate::load_key(&args.key)?;
    if !key.is_private() {
        bail!("{} does not contain a private key", args.key.display());
    }
    let algorithm = select_algorithm(args.algorithm.as_deref(), config, &record, &key, registry)?;
    let message = read_message(&args.file)?;

    let signature = algorithm
        .sign(&message, &key, SignOptions::new())
        .with_context(|| format!("{} signing failed", algorithm.name()))?;
    tracing::info!(algorithm = algorithm.name(), bytes = message.len(), "signed file");

    println!("{}", hex::encode(signature));
    Ok(0)
}

/// Verify a hex signature over a file. Exit code 0 if valid, 1 if not.
pub fn run_verify(args: &VerifyArgs, registry: &Registry, config: &CliConfig) -> Result<u8> {
    let (record, key) = crate::load_key(&args.key)?;
    let algorithm = select_algorithm(args.algorithm.as_deref(), config, &record, &key, registry)?;
    let message = read_message(&args.file)?;
    let signature = hex::decode(args.signature.trim()).context("signature is not valid hex")?;

    match algorithm.verify(&message, &signature, &key.public_key()) {
        Ok(()) => {
            println!("OK: signature is valid");
            Ok(0)
        }
        Err(SignatureError::InvalidSignature) => {
            println!("FAIL: signature verification failed");
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("{} verification failed", algorithm.name())),
    }
}

fn select_algorithm(
    explicit: Option<&str>,
    config: &CliConfig,
    record: &KeyRecord,
    key: &Key,
    registry: &Registry,
) -> Result<Box<dyn Algorithm>> {
    let name = explicit
        .map(str::to_string)
        .or_else(|| config.default_algorithm.clone())
        .or_else(|| record.scheme.clone())
        .or_else(|| KeyType::of(key).map(|t| t.scheme().to_string()))
        .ok_or_else(|| {
            anyhow!(
                "cannot infer an algorithm for {}; pass --algorithm",
                key.describe()
            )
        })?;
    tracing::debug!(algorithm = %name, "selected signature algorithm");
    registry
        .resolve(&name)
        .ok_or_else(|| anyhow!("unknown signature algorithm: {name}"))
}

fn read_message(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))
}
