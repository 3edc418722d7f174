//! # Key Material
//!
//! Owned, validated key types for every supported algorithm family, and the
//! [`Key`] variant that [`Signer`](crate::Signer) and
//! [`Verifier`](crate::Verifier) implementations accept.
//!
//! ## Security Invariant
//!
//! A private key value is always consistent with its public half. The
//! constructors derive the public part from the secret, and the decoder
//! refuses records whose declared public key disagrees with the derived one.
//! Private keys never appear in `Debug` output.

use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use p256::elliptic_curve::sec1::FromEncodedPoint;

use crate::error::KeyError;

/// Byte length of an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_SIZE: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Byte length of an Ed25519 private key in its `seed ‖ public` form.
pub const ED25519_PRIVATE_KEY_SIZE: usize = ed25519_dalek::KEYPAIR_LENGTH;

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// An Ed25519 public key (a valid compressed Edwards point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey(ed25519_dalek::VerifyingKey);

impl Ed25519PublicKey {
    /// Parse a 32-byte public key, rejecting encodings that are not points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: &[u8; ED25519_PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| KeyError::InvalidLength {
                what: "ed25519 public key",
                expected: ED25519_PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        ed25519_dalek::VerifyingKey::from_bytes(arr)
            .map(Self)
            .map_err(|e| KeyError::InvalidPoint(e.to_string()))
    }

    /// The raw 32-byte encoding.
    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_SIZE] {
        self.0.as_bytes()
    }

    pub(crate) fn verifying_key(&self) -> &ed25519_dalek::VerifyingKey {
        &self.0
    }
}

/// An Ed25519 private key. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519PrivateKey(ed25519_dalek::SigningKey);

impl Ed25519PrivateKey {
    /// Generate a fresh key from a cryptographically secure source.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Self {
        Self(ed25519_dalek::SigningKey::generate(rng))
    }

    /// Expand a 32-byte seed.
    pub fn from_seed(seed: &[u8; ed25519_dalek::SECRET_KEY_LENGTH]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(seed))
    }

    /// Load the 64-byte `seed ‖ public` form.
    ///
    /// Fails with [`KeyError::KeyMismatch`] when the embedded public suffix
    /// is not the key derived from the seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: &[u8; ED25519_PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| KeyError::InvalidLength {
                what: "ed25519 private key",
                expected: ED25519_PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        ed25519_dalek::SigningKey::from_keypair_bytes(arr)
            .map(Self)
            .map_err(|_| KeyError::KeyMismatch)
    }

    /// The public half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.0.verifying_key())
    }

    /// The 64-byte `seed ‖ public` form.
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; ED25519_PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.0.to_keypair_bytes())
    }

    pub(crate) fn signing_key(&self) -> &ed25519_dalek::SigningKey {
        &self.0
    }
}

impl std::fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PrivateKey(<private>)")
    }
}

// ---------------------------------------------------------------------------
// ECDSA
// ---------------------------------------------------------------------------

/// NIST curves supported for ECDSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
}

impl EcdsaCurve {
    /// Curve order bit size.
    pub fn bits(&self) -> usize {
        match self {
            Self::P256 => 256,
            Self::P384 => 384,
        }
    }

    /// Byte size of a scalar or coordinate, `ceil(bits / 8)`.
    pub fn key_size(&self) -> usize {
        self.bits().div_ceil(8)
    }
}

impl std::fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P256 => write!(f, "P-256"),
            Self::P384 => write!(f, "P-384"),
        }
    }
}

/// An ECDSA public key: a validated point on one of the supported curves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcdsaPublicKey {
    /// Point on P-256.
    P256(p256::ecdsa::VerifyingKey),
    /// Point on P-384.
    P384(p384::ecdsa::VerifyingKey),
}

impl EcdsaPublicKey {
    /// Decode a SEC1 point: uncompressed (tag `0x04`) or compressed
    /// (tag `0x02`/`0x03`).
    ///
    /// The point must satisfy the curve equation and must not be the
    /// identity, even when its coordinates decode numerically.
    pub fn from_sec1_bytes(curve: EcdsaCurve, bytes: &[u8]) -> Result<Self, KeyError> {
        let size = curve.key_size();
        let Some(&tag) = bytes.first() else {
            return Err(KeyError::InvalidLength {
                what: "ecdsa public key",
                expected: 1 + 2 * size,
                actual: 0,
            });
        };
        let expected = match tag {
            0x02 | 0x03 => 1 + size,
            0x04 => 1 + 2 * size,
            other => return Err(KeyError::UnsupportedPointEncoding(other)),
        };
        if bytes.len() != expected {
            return Err(KeyError::InvalidLength {
                what: "ecdsa public key",
                expected,
                actual: bytes.len(),
            });
        }

        let off_curve = || KeyError::InvalidPoint(format!("point is not on the {curve} curve"));
        match curve {
            EcdsaCurve::P256 => {
                let encoded = p256::EncodedPoint::from_bytes(bytes)
                    .map_err(|e| KeyError::InvalidPoint(e.to_string()))?;
                let point: Option<p256::PublicKey> =
                    p256::PublicKey::from_encoded_point(&encoded).into();
                point
                    .map(|p| Self::P256(p.into()))
                    .ok_or_else(off_curve)
            }
            EcdsaCurve::P384 => {
                let encoded = p384::EncodedPoint::from_bytes(bytes)
                    .map_err(|e| KeyError::InvalidPoint(e.to_string()))?;
                let point: Option<p384::PublicKey> =
                    p384::PublicKey::from_encoded_point(&encoded).into();
                point
                    .map(|p| Self::P384(p.into()))
                    .ok_or_else(off_curve)
            }
        }
    }

    /// SEC1 encoding of the point.
    pub fn to_sec1_bytes(&self, compress: bool) -> Vec<u8> {
        match self {
            Self::P256(vk) => vk.to_encoded_point(compress).as_bytes().to_vec(),
            Self::P384(vk) => vk.to_encoded_point(compress).as_bytes().to_vec(),
        }
    }

    /// The curve this point lives on.
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            Self::P256(_) => EcdsaCurve::P256,
            Self::P384(_) => EcdsaCurve::P384,
        }
    }
}

/// An ECDSA private scalar together with its curve. Zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub enum EcdsaPrivateKey {
    /// Scalar on P-256.
    P256(p256::ecdsa::SigningKey),
    /// Scalar on P-384.
    P384(p384::ecdsa::SigningKey),
}

impl EcdsaPrivateKey {
    /// Generate a fresh key on `curve`.
    pub fn generate<R: CryptoRngCore>(curve: EcdsaCurve, rng: &mut R) -> Self {
        match curve {
            EcdsaCurve::P256 => Self::P256(p256::ecdsa::SigningKey::random(rng)),
            EcdsaCurve::P384 => Self::P384(p384::ecdsa::SigningKey::random(rng)),
        }
    }

    /// Load a big-endian scalar of exactly `curve.key_size()` bytes.
    pub fn from_scalar_bytes(curve: EcdsaCurve, bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != curve.key_size() {
            return Err(KeyError::InvalidLength {
                what: "ecdsa private key",
                expected: curve.key_size(),
                actual: bytes.len(),
            });
        }
        match curve {
            EcdsaCurve::P256 => p256::ecdsa::SigningKey::from_slice(bytes)
                .map(Self::P256)
                .map_err(|_| KeyError::InvalidScalar),
            EcdsaCurve::P384 => p384::ecdsa::SigningKey::from_slice(bytes)
                .map(Self::P384)
                .map_err(|_| KeyError::InvalidScalar),
        }
    }

    /// Big-endian scalar bytes.
    pub fn to_scalar_bytes(&self) -> Zeroizing<Vec<u8>> {
        match self {
            Self::P256(sk) => Zeroizing::new(sk.to_bytes().to_vec()),
            Self::P384(sk) => Zeroizing::new(sk.to_bytes().to_vec()),
        }
    }

    /// The public point `scalar · G`.
    pub fn public_key(&self) -> EcdsaPublicKey {
        match self {
            Self::P256(sk) => EcdsaPublicKey::P256(sk.verifying_key().clone()),
            Self::P384(sk) => EcdsaPublicKey::P384(sk.verifying_key().clone()),
        }
    }

    /// The curve this scalar belongs to.
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            Self::P256(_) => EcdsaCurve::P256,
            Self::P384(_) => EcdsaCurve::P384,
        }
    }
}

impl std::fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EcdsaPrivateKey({}, <private>)", self.curve())
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Key material accepted by the signature algorithms.
///
/// Signers take the private variants, verifiers the public ones. Anything
/// else is rejected with [`SignatureError::InvalidKey`](crate::SignatureError::InvalidKey).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Ed25519 public key.
    Ed25519Public(Ed25519PublicKey),
    /// Ed25519 key pair.
    Ed25519Private(Ed25519PrivateKey),
    /// ECDSA public point.
    EcdsaPublic(EcdsaPublicKey),
    /// ECDSA key pair.
    EcdsaPrivate(EcdsaPrivateKey),
}

impl Key {
    /// Whether this key carries secret material.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Ed25519Private(_) | Self::EcdsaPrivate(_))
    }

    /// The public half of this key. Public keys return a copy of themselves.
    pub fn public_key(&self) -> Key {
        match self {
            Self::Ed25519Public(pk) => Self::Ed25519Public(*pk),
            Self::Ed25519Private(sk) => Self::Ed25519Public(sk.public_key()),
            Self::EcdsaPublic(pk) => Self::EcdsaPublic(pk.clone()),
            Self::EcdsaPrivate(sk) => Self::EcdsaPublic(sk.public_key()),
        }
    }

    /// Raw public key bytes: 32 bytes for Ed25519, an uncompressed SEC1
    /// point for ECDSA.
    pub fn public_bytes(&self) -> Vec<u8> {
        match self.public_key() {
            Self::Ed25519Public(pk) => pk.as_bytes().to_vec(),
            Self::EcdsaPublic(pk) => pk.to_sec1_bytes(false),
            Self::Ed25519Private(_) | Self::EcdsaPrivate(_) => Vec::new(),
        }
    }

    /// Short description of the key family, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Ed25519Public(_) => "ed25519 public key".to_string(),
            Self::Ed25519Private(_) => "ed25519 private key".to_string(),
            Self::EcdsaPublic(pk) => format!("ecdsa {} public key", pk.curve()),
            Self::EcdsaPrivate(sk) => format!("ecdsa {} private key", sk.curve()),
        }
    }
}

impl From<Ed25519PublicKey> for Key {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519Public(key)
    }
}

impl From<Ed25519PrivateKey> for Key {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519Private(key)
    }
}

impl From<EcdsaPublicKey> for Key {
    fn from(key: EcdsaPublicKey) -> Self {
        Self::EcdsaPublic(key)
    }
}

impl From<EcdsaPrivateKey> for Key {
    fn from(key: EcdsaPrivateKey) -> Self {
        Self::EcdsaPrivate(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SEED: &[u8; 32] = b"32-characters-deterministic-seed";

    #[test]
    fn ed25519_public_from_seed() {
        let sk = Ed25519PrivateKey::from_seed(SEED);
        assert_eq!(
            hex::encode(sk.public_key().as_bytes()),
            "9589642d1c890b452e3c4084aaa19405a0c78fca89f862e366ced34702a119c6"
        );
    }

    #[test]
    fn ed25519_keypair_bytes_embed_public_suffix() {
        let sk = Ed25519PrivateKey::from_seed(SEED);
        let bytes = sk.to_keypair_bytes();
        assert_eq!(&bytes[..32], SEED);
        assert_eq!(&bytes[32..], sk.public_key().as_bytes());
        assert_eq!(Ed25519PrivateKey::from_keypair_bytes(&bytes[..]).unwrap(), sk);
    }

    #[test]
    fn ed25519_keypair_with_foreign_suffix_rejected() {
        let sk = Ed25519PrivateKey::from_seed(SEED);
        let other = Ed25519PrivateKey::from_seed(b"other-seed-for-deterministic-key");
        let mut bytes = sk.to_keypair_bytes().to_vec();
        bytes[32..].copy_from_slice(other.public_key().as_bytes());
        assert!(matches!(
            Ed25519PrivateKey::from_keypair_bytes(&bytes),
            Err(KeyError::KeyMismatch)
        ));
    }

    #[test]
    fn ed25519_wrong_lengths_rejected() {
        assert!(matches!(
            Ed25519PublicKey::from_bytes(b"000000000"),
            Err(KeyError::InvalidLength { expected: 32, actual: 9, .. })
        ));
        assert!(matches!(
            Ed25519PrivateKey::from_keypair_bytes(&[]),
            Err(KeyError::InvalidLength { expected: 64, actual: 0, .. })
        ));
    }

    #[test]
    fn ecdsa_curve_sizes() {
        assert_eq!(EcdsaCurve::P256.key_size(), 32);
        assert_eq!(EcdsaCurve::P384.key_size(), 48);
        assert_eq!(EcdsaCurve::P384.bits(), 384);
    }

    #[test]
    fn ecdsa_compressed_and_uncompressed_decode_to_same_point() {
        let mut rng = StdRng::seed_from_u64(1);
        for curve in [EcdsaCurve::P256, EcdsaCurve::P384] {
            let pk = EcdsaPrivateKey::generate(curve, &mut rng).public_key();
            let full = pk.to_sec1_bytes(false);
            let compressed = pk.to_sec1_bytes(true);
            assert_eq!(full.len(), 1 + 2 * curve.key_size());
            assert_eq!(compressed.len(), 1 + curve.key_size());
            assert_eq!(EcdsaPublicKey::from_sec1_bytes(curve, &full).unwrap(), pk);
            assert_eq!(EcdsaPublicKey::from_sec1_bytes(curve, &compressed).unwrap(), pk);
        }
    }

    #[test]
    fn ecdsa_unknown_tag_rejected() {
        let mut bytes = vec![0x05];
        bytes.extend_from_slice(&[1u8; 64]);
        assert!(matches!(
            EcdsaPublicKey::from_sec1_bytes(EcdsaCurve::P256, &bytes),
            Err(KeyError::UnsupportedPointEncoding(0x05))
        ));
        assert!(matches!(
            EcdsaPublicKey::from_sec1_bytes(EcdsaCurve::P256, &[0x00]),
            Err(KeyError::UnsupportedPointEncoding(0x00))
        ));
    }

    #[test]
    fn ecdsa_off_curve_point_rejected() {
        let mut bytes = vec![0x04];
        bytes.extend_from_slice(&[0u8; 31]);
        bytes.push(1);
        bytes.extend_from_slice(&[0u8; 31]);
        bytes.push(1);
        assert!(matches!(
            EcdsaPublicKey::from_sec1_bytes(EcdsaCurve::P256, &bytes),
            Err(KeyError::InvalidPoint(_))
        ));
    }

    #[test]
    fn ecdsa_scalar_roundtrip_and_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let sk = EcdsaPrivateKey::generate(EcdsaCurve::P256, &mut rng);
        let scalar = sk.to_scalar_bytes();
        assert_eq!(
            EcdsaPrivateKey::from_scalar_bytes(EcdsaCurve::P256, &scalar).unwrap(),
            sk
        );
        assert!(matches!(
            EcdsaPrivateKey::from_scalar_bytes(EcdsaCurve::P256, &[0u8; 32]),
            Err(KeyError::InvalidScalar)
        ));
        assert!(matches!(
            EcdsaPrivateKey::from_scalar_bytes(EcdsaCurve::P256, &[0xffu8; 32]),
            Err(KeyError::InvalidScalar)
        ));
        assert!(matches!(
            EcdsaPrivateKey::from_scalar_bytes(EcdsaCurve::P384, &scalar),
            Err(KeyError::InvalidLength { expected: 48, .. })
        ));
    }

    #[test]
    fn debug_does_not_leak_private_keys() {
        let mut rng = StdRng::seed_from_u64(3);
        let ed = Key::from(Ed25519PrivateKey::from_seed(SEED));
        let ec = Key::from(EcdsaPrivateKey::generate(EcdsaCurve::P384, &mut rng));
        assert_eq!(format!("{ed:?}"), "Ed25519Private(Ed25519PrivateKey(<private>))");
        assert_eq!(format!("{ec:?}"), "EcdsaPrivate(EcdsaPrivateKey(P-384, <private>))");
    }

    #[test]
    fn public_key_of_private_key() {
        let sk = Ed25519PrivateKey::from_seed(SEED);
        let key = Key::from(sk.clone());
        assert!(key.is_private());
        let public = key.public_key();
        assert!(!public.is_private());
        assert_eq!(public, Key::from(sk.public_key()));
        assert_eq!(public.public_bytes(), sk.public_key().as_bytes().to_vec());
    }
}
