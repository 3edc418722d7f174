//! # ECDSA Signing and Verification
//!
//! One configurable implementation parameterized by curve and hash
//! function. Two parameter sets are built in:
//!
//! | Name                    | Curve | Hash    | Signature |
//! |-------------------------|-------|---------|-----------|
//! | `ecdsa-sha2-nistp256`   | P-256 | SHA-256 | 64 bytes  |
//! | `ecdsa-sha384-nistp384` | P-384 | SHA-384 | 96 bytes  |
//!
//! ## Signature Format
//!
//! Signatures are `r ‖ s`, each a big-endian integer zero-padded on the left
//! to the curve's key size. They are not DER-encoded.
//!
//! ## Security Invariant
//!
//! An instance is bound to exactly one curve: a key on any other curve is
//! rejected with [`SignatureError::InvalidKey`] even if it is otherwise
//! valid. Every cryptographic failure, on either side, collapses into
//! [`SignatureError::InvalidSignature`].

use p256::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};

use crate::algorithm::{Algorithm, SignOptions, Signer, Verifier};
use crate::error::SignatureError;
use crate::hash::HashFunction;
use crate::key::{EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey, Key};

/// Registry name of ECDSA over P-256 with SHA-256.
pub const ECDSA_SHA2_NISTP256: &str = "ecdsa-sha2-nistp256";

/// Registry name of ECDSA over P-384 with SHA-384.
pub const ECDSA_SHA384_NISTP384: &str = "ecdsa-sha384-nistp384";

/// An ECDSA parameter set.
#[derive(Debug, Clone)]
pub struct EcdsaAlgorithm {
    name: String,
    hash: HashFunction,
    curve: EcdsaCurve,
}

impl EcdsaAlgorithm {
    /// Create a parameter set under `name`.
    pub fn new(name: impl Into<String>, hash: HashFunction, curve: EcdsaCurve) -> Self {
        Self {
            name: name.into(),
            hash,
            curve,
        }
    }

    /// `ecdsa-sha2-nistp256`.
    pub fn p256_sha256() -> Self {
        Self::new(ECDSA_SHA2_NISTP256, HashFunction::Sha256, EcdsaCurve::P256)
    }

    /// `ecdsa-sha384-nistp384`.
    pub fn p384_sha384() -> Self {
        Self::new(ECDSA_SHA384_NISTP384, HashFunction::Sha384, EcdsaCurve::P384)
    }

    /// The curve keys must belong to.
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    /// The message digest.
    pub fn hash(&self) -> HashFunction {
        self.hash
    }

    /// Byte length of each of `r` and `s`.
    pub fn key_size(&self) -> usize {
        self.curve.key_size()
    }

    fn check_curve(&self, curve: EcdsaCurve) -> Result<(), SignatureError> {
        if curve.bits() != self.curve.bits() {
            return Err(SignatureError::InvalidKey(format!(
                "ecdsa: can't use a {curve} key with {}, curve mismatch",
                self.name
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

impl Signer for EcdsaAlgorithm {
    fn sign(
        &self,
        message: &[u8],
        key: &Key,
        opts: SignOptions<'_>,
    ) -> Result<Vec<u8>, SignatureError> {
        if message.is_empty() {
            return Err(SignatureError::InvalidArgument("ecdsa: message is empty"));
        }
        let Key::EcdsaPrivate(sk) = key else {
            return Err(SignatureError::InvalidKey(format!(
                "ecdsa: unsupported private key type ({})",
                key.describe()
            )));
        };
        self.check_curve(sk.curve())?;
        if !self.hash.is_available() {
            return Err(SignatureError::HashUnavailable(self.hash));
        }

        let digest = self.hash.digest(message)?;
        let signature = opts.with_rng(|mut rng| match sk {
            EcdsaPrivateKey::P256(sk) => {
                RandomizedPrehashSigner::<p256::ecdsa::Signature>::sign_prehash_with_rng(
                    sk, &mut rng, &digest,
                )
                .map(|sig| sig.to_bytes().to_vec())
            }
            EcdsaPrivateKey::P384(sk) => {
                RandomizedPrehashSigner::<p384::ecdsa::Signature>::sign_prehash_with_rng(
                    sk, &mut rng, &digest,
                )
                .map(|sig| sig.to_bytes().to_vec())
            }
        });

        // Fixed-width `r ‖ s`, each zero-padded to the key size.
        signature.map_err(|_| SignatureError::InvalidSignature)
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

impl Verifier for EcdsaAlgorithm {
    fn verify(&self, message: &[u8], signature: &[u8], key: &Key) -> Result<(), SignatureError> {
        if message.is_empty() {
            return Err(SignatureError::InvalidArgument("ecdsa: message is empty"));
        }
        if signature.is_empty() {
            return Err(SignatureError::InvalidArgument("ecdsa: signature is empty"));
        }
        let Key::EcdsaPublic(pk) = key else {
            return Err(SignatureError::InvalidKey(format!(
                "ecdsa: unsupported public key type ({})",
                key.describe()
            )));
        };
        self.check_curve(pk.curve())?;
        if signature.len() != 2 * self.key_size() {
            return Err(SignatureError::InvalidSignature);
        }
        if !self.hash.is_available() {
            return Err(SignatureError::HashUnavailable(self.hash));
        }

        let digest = self.hash.digest(message)?;
        let verified = match pk {
            EcdsaPublicKey::P256(vk) => p256::ecdsa::Signature::from_slice(signature)
                .and_then(|sig| vk.verify_prehash(&digest, &sig)),
            EcdsaPublicKey::P384(vk) => p384::ecdsa::Signature::from_slice(signature)
                .and_then(|sig| vk.verify_prehash(&digest, &sig)),
        };
        verified.map_err(|_| SignatureError::InvalidSignature)
    }
}

impl Algorithm for EcdsaAlgorithm {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Ed25519PrivateKey;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key_pair(curve: EcdsaCurve, seed: u64) -> (Key, Key) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sk = Key::from(EcdsaPrivateKey::generate(curve, &mut rng));
        let pk = sk.public_key();
        (sk, pk)
    }

    #[test]
    fn parameter_sets() {
        let p256 = EcdsaAlgorithm::p256_sha256();
        assert_eq!(p256.name(), "ecdsa-sha2-nistp256");
        assert_eq!(p256.key_size(), 32);
        assert_eq!(p256.hash(), HashFunction::Sha256);

        let p384 = EcdsaAlgorithm::p384_sha384();
        assert_eq!(p384.name(), "ecdsa-sha384-nistp384");
        assert_eq!(p384.key_size(), 48);
        assert_eq!(p384.curve(), EcdsaCurve::P384);
    }

    #[test]
    fn sign_and_verify_both_curves() {
        for (alg, curve) in [
            (EcdsaAlgorithm::p256_sha256(), EcdsaCurve::P256),
            (EcdsaAlgorithm::p384_sha384(), EcdsaCurve::P384),
        ] {
            let (sk, pk) = key_pair(curve, 1);
            let sig = alg.sign(b"test", &sk, SignOptions::new()).unwrap();
            assert_eq!(sig.len(), 2 * curve.key_size());
            alg.verify(b"test", &sig, &pk)
                .expect("valid signature should verify");
        }
    }

    #[test]
    fn deterministic_with_seeded_source() {
        let alg = EcdsaAlgorithm::p256_sha256();
        let (sk, _) = key_pair(EcdsaCurve::P256, 2);

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = alg
            .sign(b"test", &sk, SignOptions::new().with_random_source(&mut rng_a))
            .unwrap();
        let b = alg
            .sign(b"test", &sk, SignOptions::new().with_random_source(&mut rng_b))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sign_rejects_empty_message() {
        let (sk, _) = key_pair(EcdsaCurve::P256, 3);
        assert!(matches!(
            EcdsaAlgorithm::p256_sha256().sign(b"", &sk, SignOptions::new()),
            Err(SignatureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn sign_rejects_foreign_key_types() {
        let alg = EcdsaAlgorithm::p256_sha256();
        let ed = Key::from(Ed25519PrivateKey::from_seed(&[7u8; 32]));
        let (_, pk) = key_pair(EcdsaCurve::P256, 4);
        for key in [ed, pk] {
            assert!(matches!(
                alg.sign(b"test", &key, SignOptions::new()),
                Err(SignatureError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn curve_binding() {
        let (sk256, pk256) = key_pair(EcdsaCurve::P256, 5);
        let (sk384, pk384) = key_pair(EcdsaCurve::P384, 5);
        let p256 = EcdsaAlgorithm::p256_sha256();
        let p384 = EcdsaAlgorithm::p384_sha384();

        assert!(matches!(
            p256.sign(b"test", &sk384, SignOptions::new()),
            Err(SignatureError::InvalidKey(_))
        ));
        assert!(matches!(
            p384.sign(b"test", &sk256, SignOptions::new()),
            Err(SignatureError::InvalidKey(_))
        ));

        let sig256 = p256.sign(b"test", &sk256, SignOptions::new()).unwrap();
        let sig384 = p384.sign(b"test", &sk384, SignOptions::new()).unwrap();
        assert!(matches!(
            p256.verify(b"test", &sig256, &pk384),
            Err(SignatureError::InvalidKey(_))
        ));
        assert!(matches!(
            p384.verify(b"test", &sig384, &pk256),
            Err(SignatureError::InvalidKey(_))
        ));
    }

    #[test]
    fn verify_rejects_empty_arguments() {
        let (_, pk) = key_pair(EcdsaCurve::P256, 6);
        let alg = EcdsaAlgorithm::p256_sha256();
        assert!(matches!(
            alg.verify(b"", &[1u8; 64], &pk),
            Err(SignatureError::InvalidArgument(_))
        ));
        assert!(matches!(
            alg.verify(b"test", b"", &pk),
            Err(SignatureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn verify_rejects_private_key() {
        let (sk, _) = key_pair(EcdsaCurve::P256, 7);
        let alg = EcdsaAlgorithm::p256_sha256();
        let sig = alg.sign(b"test", &sk, SignOptions::new()).unwrap();
        assert!(matches!(
            alg.verify(b"test", &sig, &sk),
            Err(SignatureError::InvalidKey(_))
        ));
    }

    #[test]
    fn verify_rejects_wrong_length() {
        let (sk, pk) = key_pair(EcdsaCurve::P256, 8);
        let alg = EcdsaAlgorithm::p256_sha256();
        let mut sig = alg.sign(b"test", &sk, SignOptions::new()).unwrap();
        sig.push(0);
        assert!(matches!(
            alg.verify(b"test", &sig, &pk),
            Err(SignatureError::InvalidSignature)
        ));
        assert!(matches!(
            alg.verify(b"test", &sig[..63], &pk),
            Err(SignatureError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_collapses_malformed_scalars() {
        let (_, pk) = key_pair(EcdsaCurve::P256, 9);
        let alg = EcdsaAlgorithm::p256_sha256();
        // Zero and above-order scalars fail the same way as a wrong signature.
        for sig in [[0u8; 64], [0xffu8; 64]] {
            assert!(matches!(
                alg.verify(b"test", &sig, &pk),
                Err(SignatureError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn verify_rejects_other_message() {
        let (sk, pk) = key_pair(EcdsaCurve::P384, 10);
        let alg = EcdsaAlgorithm::p384_sha384();
        let sig = alg.sign(b"original", &sk, SignOptions::new()).unwrap();
        assert!(matches!(
            alg.verify(b"tampered", &sig, &pk),
            Err(SignatureError::InvalidSignature)
        ));
    }

    #[cfg(not(feature = "sha512"))]
    #[test]
    fn unavailable_hash_reported() {
        let alg = EcdsaAlgorithm::new(
            "ecdsa-sha512-nistp384",
            HashFunction::Sha512,
            EcdsaCurve::P384,
        );
        let (sk, pk) = key_pair(EcdsaCurve::P384, 11);
        assert!(matches!(
            alg.sign(b"test", &sk, SignOptions::new()),
            Err(SignatureError::HashUnavailable(HashFunction::Sha512))
        ));
        assert!(matches!(
            alg.verify(b"test", &[1u8; 96], &pk),
            Err(SignatureError::HashUnavailable(HashFunction::Sha512))
        ));
    }
}
