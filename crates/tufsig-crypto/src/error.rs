//! # Error Types
//!
//! Structured errors for signing, verification and key decoding.
//! Uses `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Argument and key validation errors carry enough context to branch on.
//! - Cryptographic failures collapse into [`SignatureError::InvalidSignature`]
//!   so a malformed signature and a well-formed wrong signature are
//!   indistinguishable to the caller.

use thiserror::Error;

use crate::hash::HashFunction;

/// Errors from [`Signer`](crate::Signer) and [`Verifier`](crate::Verifier)
/// implementations.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// An operation argument is empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key has the wrong shape for the algorithm, or is bound to a
    /// different curve.
    #[error("invalid or unsupported key: {0}")]
    InvalidKey(String),

    /// The configured hash function is not linked into this build.
    #[error("the required hash function {0} is not available")]
    HashUnavailable(HashFunction),

    /// Signature length mismatch, verification failure, or an ECDSA signing
    /// failure. Carries no detail.
    #[error("invalid signature")]
    InvalidSignature,

    /// The Ed25519 backend refused to produce a signature.
    #[error("unable to sign payload: {0}")]
    SigningFailed(#[source] ed25519_dalek::SignatureError),
}

/// Errors from decoding or encoding key records.
#[derive(Error, Debug)]
pub enum KeyError {
    /// The encoded input exceeds the decoder's size bound.
    #[error("key input of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Size of the rejected input.
        size: usize,
        /// Maximum accepted size.
        limit: usize,
    },

    /// The key record or envelope is not valid JSON of the expected shape.
    #[error("unable to decode the key components: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A key component has the wrong byte length.
    #[error("unexpected {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Which component was rejected.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Length found in the input.
        actual: usize,
    },

    /// The Ed25519 public key is one of the known small-order points.
    #[error("the public key is a low-order point")]
    LowOrderPoint,

    /// The public key does not decode to a valid curve point.
    #[error("invalid public key point: {0}")]
    InvalidPoint(String),

    /// The ECDSA public key uses an unknown SEC1 tag byte.
    #[error("unsupported ecdsa public key encoding tag {0:#04x}")]
    UnsupportedPointEncoding(u8),

    /// The ECDSA private scalar is zero or not below the group order.
    #[error("ecdsa private scalar is out of range")]
    InvalidScalar,

    /// The private component does not derive the declared public key.
    #[error("public and private keys don't match")]
    KeyMismatch,

    /// The declared key type has no decoder.
    #[error("unsupported key type {0:?}")]
    UnsupportedKeyType(String),
}

impl KeyError {
    /// Whether this error rejects the key material itself, as opposed to
    /// the envelope around it or its declared type.
    pub fn is_invalid_key(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. }
                | Self::LowOrderPoint
                | Self::InvalidPoint(_)
                | Self::UnsupportedPointEncoding(_)
                | Self::InvalidScalar
                | Self::KeyMismatch
        )
    }
}
