//! # Ed25519 Signing and Verification
//!
//! Pure Ed25519 (no pre-hash) over arbitrary byte payloads, registered as
//! `"ed25519"`.
//!
//! ## Security Invariant
//!
//! - Signing accepts only [`Key::Ed25519Private`]; verification accepts only
//!   [`Key::Ed25519Public`]. Key lengths are enforced when the key value is
//!   constructed, so no shape branching happens here.
//! - Malformed and wrong signatures both surface as
//!   [`SignatureError::InvalidSignature`].
//!
//! Ed25519 signing is deterministic; the randomness source in
//! [`SignOptions`] is accepted and left untouched.

use ed25519_dalek::{Signer as _, Verifier as _};

use crate::algorithm::{Algorithm, SignOptions, Signer, Verifier};
use crate::error::SignatureError;
use crate::key::Key;

/// Registry name of the Ed25519 algorithm.
pub const ED25519: &str = "ed25519";

/// Byte length of an Ed25519 signature.
pub const SIGNATURE_SIZE: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// The Ed25519 signature algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Algorithm;

impl Ed25519Algorithm {
    /// Create the algorithm.
    pub fn new() -> Self {
        Self
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

impl Signer for Ed25519Algorithm {
    fn sign(
        &self,
        message: &[u8],
        key: &Key,
        _opts: SignOptions<'_>,
    ) -> Result<Vec<u8>, SignatureError> {
        if message.is_empty() {
            return Err(SignatureError::InvalidArgument("ed25519: message is empty"));
        }
        let Key::Ed25519Private(sk) = key else {
            return Err(SignatureError::InvalidKey(format!(
                "ed25519: unsupported private key type ({})",
                key.describe()
            )));
        };

        let signature = sk
            .signing_key()
            .try_sign(message)
            .map_err(SignatureError::SigningFailed)?;
        Ok(signature.to_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

impl Verifier for Ed25519Algorithm {
    fn verify(&self, message: &[u8], signature: &[u8], key: &Key) -> Result<(), SignatureError> {
        if message.is_empty() {
            return Err(SignatureError::InvalidArgument("ed25519: message is empty"));
        }
        if signature.is_empty() {
            return Err(SignatureError::InvalidArgument("ed25519: signature is empty"));
        }
        let Key::Ed25519Public(pk) = key else {
            return Err(SignatureError::InvalidKey(format!(
                "ed25519: unsupported public key type ({})",
                key.describe()
            )));
        };

        let signature = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| SignatureError::InvalidSignature)?;
        pk.verifying_key()
            .verify(message, &signature)
            .map_err(|_| SignatureError::InvalidSignature)
    }
}

impl Algorithm for Ed25519Algorithm {
    fn name(&self) -> &str {
        ED25519
    }
}
