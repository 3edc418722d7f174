//! # tufsig-crypto — Signature Algorithms
//!
//! Pluggable signing and verification for an update trust framework:
//!
//! - **Ed25519** (`"ed25519"`): pure Ed25519 over the message.
//! - **ECDSA** (`"ecdsa-sha2-nistp256"`, `"ecdsa-sha384-nistp384"`): the
//!   message is hashed, then signed; signatures are fixed-width `r ‖ s`.
//! - **Registry**: name → factory lookup so callers can pick an algorithm at
//!   runtime. Populated explicitly with [`registry::install_builtin`].
//! - **Key decoding**: validating decoder for JSON key envelopes, with a
//!   size bound, the Ed25519 small-order blacklist, ECDSA curve membership
//!   and public/private consistency checks.
//!
//! ```rust
//! use tufsig_crypto::{registry, Ed25519PrivateKey, Key, SignOptions, Signer, Verifier};
//!
//! let registry = registry::install_builtin();
//! let ed25519 = registry.resolve("ed25519").unwrap();
//!
//! let key = Key::from(Ed25519PrivateKey::from_seed(&[7u8; 32]));
//! let signature = ed25519.sign(b"payload", &key, SignOptions::new()).unwrap();
//! assert!(ed25519.verify(b"payload", &signature, &key.public_key()).is_ok());
//! ```
//!
//! ## Crate Policy
//!
//! - All argument and key validation happens before any cryptographic work.
//! - Verification failures carry no detail beyond "invalid signature".
//! - Private key material is zeroized on drop and never printed by `Debug`.

pub mod algorithm;
pub mod decode;
pub mod ecdsa;
pub mod ed25519;
pub mod error;
pub mod hash;
pub mod key;
pub mod registry;

pub use algorithm::{Algorithm, SignOptions, Signer, Verifier};
pub use decode::{
    decode_private_key, decode_public_key, encode_key, KeyRecord, KeyType, MAX_KEY_INPUT_SIZE,
};
pub use ecdsa::{EcdsaAlgorithm, ECDSA_SHA2_NISTP256, ECDSA_SHA384_NISTP384};
pub use ed25519::{Ed25519Algorithm, ED25519};
pub use error::{KeyError, SignatureError};
pub use hash::HashFunction;
pub use key::{EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey, Ed25519PrivateKey, Ed25519PublicKey, Key};
pub use registry::Registry;
