//! # tufsig-cli — Command-Line Interface
//!
//! Provides the `tufsig` binary on top of `tufsig-crypto`.
//!
//! ## Subcommands
//!
//! - `tufsig algorithms` — list the registered signature algorithms.
//! - `tufsig keygen` — generate a key pair as two key record files.
//! - `tufsig inspect` — decode a key record and describe it.
//! - `tufsig sign` — sign a file, printing the hex signature.
//! - `tufsig verify` — verify a hex signature over a file.
//!
//! ```bash
//! tufsig keygen --type ecdsa-sha2-nistp256 --prefix release
//! tufsig sign --key release.key.json artifact.tar.gz > artifact.sig
//! tufsig verify --key release.pub.json --signature "$(cat artifact.sig)" artifact.tar.gz
//! ```
//!
//! ## Crate Policy
//!
//! - Handlers return `anyhow::Result<u8>`; the value is the process exit
//!   code. Errors are reported by `main` and exit with 1.
//! - Key files are the JSON record documents produced by
//!   [`tufsig_crypto::KeyRecord::to_json`].

pub mod algorithms;
pub mod config;
pub mod keys;
pub mod signing;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tufsig_crypto::{decode_private_key, Key, KeyRecord, MAX_KEY_INPUT_SIZE};

/// Read and decode a key record file.
///
/// At most [`MAX_KEY_INPUT_SIZE`] + 1 bytes are read, so an oversized file
/// fails the decoder's size check without being loaded in full.
pub fn load_key(path: &Path) -> Result<(KeyRecord, Key)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open key file: {}", path.display()))?;
    let mut bytes = Vec::new();
    file.take(MAX_KEY_INPUT_SIZE as u64 + 1)
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to read key file: {}", path.display()))?;

    let record = KeyRecord::from_json(&bytes)
        .with_context(|| format!("invalid key record: {}", path.display()))?;
    // The private decoder also accepts public-only records.
    let key = decode_private_key(&record)
        .with_context(|| format!("invalid {} key: {}", record.key_type, path.display()))?;
    tracing::debug!(path = %path.display(), key = %key.describe(), "loaded key");
    Ok((record, key))
}
