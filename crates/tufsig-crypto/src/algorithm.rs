//! # Algorithm Contracts
//!
//! [`Signer`] produces signatures, [`Verifier`] checks them, and
//! [`Algorithm`] bundles both under a stable name so the
//! [`Registry`](crate::Registry) can hand out implementations by name.
//!
//! Implementations validate every argument before any cryptographic work
//! runs, and they are stateless beyond their parameters: one instance can be
//! shared across threads without synchronization.

use rand_core::{CryptoRngCore, OsRng};

use crate::error::SignatureError;
use crate::key::Key;

/// Signature producer contract.
pub trait Signer {
    /// Sign `message` with the private `key`.
    fn sign(
        &self,
        message: &[u8],
        key: &Key,
        opts: SignOptions<'_>,
    ) -> Result<Vec<u8>, SignatureError>;
}

/// Signature verifier contract.
pub trait Verifier {
    /// Check that `signature` over `message` was produced by the private
    /// counterpart of the public `key`.
    fn verify(&self, message: &[u8], signature: &[u8], key: &Key) -> Result<(), SignatureError>;
}

/// A named signing and verification scheme.
///
/// Object-safe, for use as `Box<dyn Algorithm>`.
pub trait Algorithm: Signer + Verifier + Send + Sync {
    /// The registry name of this implementation, e.g. `"ed25519"`.
    fn name(&self) -> &str;
}

/// Optional parameters for [`Signer::sign`].
///
/// The default draws randomness from the operating system CSPRNG.
#[derive(Default)]
pub struct SignOptions<'a> {
    random_source: Option<&'a mut dyn CryptoRngCore>,
}

impl<'a> SignOptions<'a> {
    /// Options with the default randomness source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the randomness source used while signing.
    ///
    /// # Security
    ///
    /// Intended for deterministic tests. A predictable or reused source
    /// leaks ECDSA private keys through nonce reuse; production callers must
    /// keep the default.
    pub fn with_random_source(mut self, rng: &'a mut dyn CryptoRngCore) -> Self {
        self.random_source = Some(rng);
        self
    }

    /// Whether a caller-supplied source replaces the OS CSPRNG.
    pub fn has_custom_random_source(&self) -> bool {
        self.random_source.is_some()
    }

    /// Run `f` with the configured randomness source, or with [`OsRng`].
    pub(crate) fn with_rng<T>(self, f: impl FnOnce(&mut dyn CryptoRngCore) -> T) -> T {
        match self.random_source {
            Some(rng) => f(rng),
            None => f(&mut OsRng),
        }
    }
}

impl std::fmt::Debug for SignOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignOptions")
            .field("custom_random_source", &self.has_custom_random_source())
            .finish()
    }
}
