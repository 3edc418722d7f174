//! # Key Subcommands
//!
//! `keygen` writes a fresh key pair as two record files:
//! `<prefix>.key.json` (private) and `<prefix>.pub.json` (public).
//! `inspect` decodes a record file and prints what it holds.
//!
//! ## Security Invariant
//!
//! On Unix the private record is created with mode `0600`. Existing files
//! are never overwritten unless `--force` is given.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use rand_core::OsRng;

use tufsig_crypto::{encode_key, EcdsaCurve, EcdsaPrivateKey, Ed25519PrivateKey, Key, KeyType};

/// Key types `keygen` can produce.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeygenType {
    /// Ed25519.
    #[value(name = "ed25519")]
    Ed25519,
    /// ECDSA over NIST P-256.
    #[value(name = "ecdsa-sha2-nistp256")]
    EcdsaSha2Nistp256,
}

/// Arguments for `tufsig keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Key type to generate.
    #[arg(long = "type", value_enum, default_value = "ed25519")]
    pub key_type: KeygenType,
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "tufsig")]
    pub prefix: String,
    /// Replace existing key files.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `tufsig inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a key record file.
    #[arg(value_name = "KEYFILE")]
    pub file: PathBuf,
}

/// Generate a key pair and write both record files.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    std::fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output.display()
        )
    })?;

    let key = match args.key_type {
        KeygenType::Ed25519 => Key::from(Ed25519PrivateKey::generate(&mut OsRng)),
        KeygenType::EcdsaSha2Nistp256 => {
            Key::from(EcdsaPrivateKey::generate(EcdsaCurve::P256, &mut OsRng))
        }
    };

    let private_json = encode_key(&key)?.to_json()?;
    let public_json = encode_key(&key.public_key())?.to_json()?;

    let private_path = args.output.join(format!("{}.key.json", args.prefix));
    let public_path = args.output.join(format!("{}.pub.json", args.prefix));
    write_key_file(&private_path, &private_json, true, args.force)?;
    write_key_file(&public_path, &public_json, false, args.force)?;

    tracing::info!(key = %key.describe(), "generated key pair");
    println!("OK: generated {} key pair", key_type_name(&key));
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());
    println!("  Public key (hex): {}", hex::encode(key.public_bytes()));
    Ok(0)
}

/// Decode a key record file and describe it.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let (record, key) = crate::load_key(&args.file)?;
    println!("type:    {}", record.key_type);
    println!("scheme:  {}", record.scheme.as_deref().unwrap_or("-"));
    println!("private: {}", if key.is_private() { "yes" } else { "no" });
    println!("public:  {}", hex::encode(key.public_bytes()));
    Ok(0)
}

fn key_type_name(key: &Key) -> &'static str {
    KeyType::of(key).map_or("unknown", |t| t.as_str())
}

fn write_key_file(path: &Path, contents: &[u8], private: bool, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "refusing to overwrite existing key file: {} (use --force)",
            path.display()
        );
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if private {
        restrict_to_owner(&mut options);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create key file: {}", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("failed to write key file: {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn restrict_to_owner(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn restrict_to_owner(_options: &mut OpenOptions) {}
