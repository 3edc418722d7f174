//! # Message Digests
//!
//! The closed set of SHA-2 hash functions an ECDSA parameter set can be
//! configured with. SHA-512 is only linked when the `sha512` feature is
//! enabled; asking for it otherwise yields
//! [`SignatureError::HashUnavailable`].

use sha2::{Digest, Sha256, Sha384};

use crate::error::SignatureError;

/// Hash function selector for pre-hashed signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-256 (32-byte digest).
    Sha256,
    /// SHA-384 (48-byte digest).
    Sha384,
    /// SHA-512 (64-byte digest). Requires the `sha512` feature.
    Sha512,
}

impl HashFunction {
    /// Digest length in bytes.
    pub fn output_size(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Whether the implementation is linked into this build.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Sha256 | Self::Sha384 => true,
            Self::Sha512 => cfg!(feature = "sha512"),
        }
    }

    /// Hash `data` in one shot.
    pub fn digest(&self, data: &[u8]) -> Result<Vec<u8>, SignatureError> {
        match self {
            Self::Sha256 => Ok(Sha256::digest(data).to_vec()),
            Self::Sha384 => Ok(Sha384::digest(data).to_vec()),
            Self::Sha512 => sha512_digest(data),
        }
    }
}

#[cfg(feature = "sha512")]
fn sha512_digest(data: &[u8]) -> Result<Vec<u8>, SignatureError> {
    Ok(sha2::Sha512::digest(data).to_vec())
}

#[cfg(not(feature = "sha512"))]
fn sha512_digest(_data: &[u8]) -> Result<Vec<u8>, SignatureError> {
    Err(SignatureError::HashUnavailable(HashFunction::Sha512))
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
        }
    }
}
