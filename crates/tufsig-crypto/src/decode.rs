//! # Key Decoding
//!
//! Turns a serialized key record into a validated [`Key`] and back.
//!
//! A record declares a key type and carries a JSON envelope
//! `{"public": <base64>, "private"?: <base64>}`. The envelope is parsed,
//! then handed to the decoder for the declared type:
//!
//! - `ed25519`: 32-byte public key, 64-byte `seed ‖ public` private key.
//! - `ecdsa-sha2-nistp256`: SEC1 point (compressed or uncompressed),
//!   32-byte big-endian private scalar.
//! - `rsassa-pss-sha256`: recognised but unsupported.
//!
//! ## Security Invariant
//!
//! - Inputs larger than [`MAX_KEY_INPUT_SIZE`] are rejected before parsing.
//! - Ed25519 public keys in the small-order subgroup are rejected, including
//!   their non-canonical encodings.
//! - ECDSA points must lie on the curve.
//! - A private component must derive the declared public component; the
//!   comparison runs in constant time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::KeyError;
use crate::key::{
    EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey, Ed25519PrivateKey, Ed25519PublicKey, Key,
    ED25519_PUBLIC_KEY_SIZE,
};

/// Upper bound on the encoded size of a key envelope or record.
pub const MAX_KEY_INPUT_SIZE: usize = 1024 * 1024;

/// Ed25519 encodings of the eight small-order points, each with both sign
/// bits. Includes the non-canonical encodings of the identity, of the
/// order-2 point and of the order-4 point with `y = 0`.
#[rustfmt::skip]
const ED25519_LOW_ORDER_POINTS: [[u8; ED25519_PUBLIC_KEY_SIZE]; 14] = [
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80,
    ],
    [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ],
    [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80,
    ],
    [
        0x26, 0xe8, 0x95, 0x8f, 0xc2, 0xb2, 0x27, 0xb0,
        0x45, 0xc3, 0xf4, 0x89, 0xf2, 0xef, 0x98, 0xf0,
        0xd5, 0xdf, 0xac, 0x05, 0xd3, 0xc6, 0x33, 0x39,
        0xb1, 0x38, 0x02, 0x88, 0x6d, 0x53, 0xfc, 0x05,
    ],
    [
        0x26, 0xe8, 0x95, 0x8f, 0xc2, 0xb2, 0x27, 0xb0,
        0x45, 0xc3, 0xf4, 0x89, 0xf2, 0xef, 0x98, 0xf0,
        0xd5, 0xdf, 0xac, 0x05, 0xd3, 0xc6, 0x33, 0x39,
        0xb1, 0x38, 0x02, 0x88, 0x6d, 0x53, 0xfc, 0x85,
    ],
    [
        0xc7, 0x17, 0x6a, 0x70, 0x3d, 0x4d, 0xd8, 0x4f,
        0xba, 0x3c, 0x0b, 0x76, 0x0d, 0x10, 0x67, 0x0f,
        0x2a, 0x20, 0x53, 0xfa, 0x2c, 0x39, 0xcc, 0xc6,
        0x4e, 0xc7, 0xfd, 0x77, 0x92, 0xac, 0x03, 0x7a,
    ],
    [
        0xc7, 0x17, 0x6a, 0x70, 0x3d, 0x4d, 0xd8, 0x4f,
        0xba, 0x3c, 0x0b, 0x76, 0x0d, 0x10, 0x67, 0x0f,
        0x2a, 0x20, 0x53, 0xfa, 0x2c, 0x39, 0xcc, 0xc6,
        0x4e, 0xc7, 0xfd, 0x77, 0x92, 0xac, 0x03, 0xfa,
    ],
    [
        0xec, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
    ],
    [
        0xec, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ],
    [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
    ],
    [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ],
    [
        0xee, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
    ],
    [
        0xee, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ],
];

// ---------------------------------------------------------------------------
// Key types and records
// ---------------------------------------------------------------------------

/// Key type strings recognised by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// `"ed25519"`.
    Ed25519,
    /// `"ecdsa-sha2-nistp256"`.
    EcdsaSha2Nistp256,
    /// `"rsassa-pss-sha256"`. Recognised, never decoded.
    RsassaPssSha256,
}

impl KeyType {
    /// The wire name of this key type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::EcdsaSha2Nistp256 => "ecdsa-sha2-nistp256",
            Self::RsassaPssSha256 => "rsassa-pss-sha256",
        }
    }

    /// The signature scheme conventionally paired with this key type.
    pub fn scheme(&self) -> &'static str {
        self.as_str()
    }

    /// The type a decoded key would be encoded as, if it has one.
    /// P-384 keys have no record type.
    pub fn of(key: &Key) -> Option<Self> {
        match key {
            Key::Ed25519Public(_) | Key::Ed25519Private(_) => Some(Self::Ed25519),
            Key::EcdsaPublic(pk) if pk.curve() == EcdsaCurve::P256 => {
                Some(Self::EcdsaSha2Nistp256)
            }
            Key::EcdsaPrivate(sk) if sk.curve() == EcdsaCurve::P256 => {
                Some(Self::EcdsaSha2Nistp256)
            }
            Key::EcdsaPublic(_) | Key::EcdsaPrivate(_) => None,
        }
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(Self::Ed25519),
            "ecdsa-sha2-nistp256" => Ok(Self::EcdsaSha2Nistp256),
            "rsassa-pss-sha256" => Ok(Self::RsassaPssSha256),
            other => Err(KeyError::UnsupportedKeyType(other.to_string())),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A serialized key: declared type, optional scheme, and the raw JSON bytes
/// of its envelope.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// Declared key type, e.g. `"ed25519"`.
    pub key_type: String,
    /// Signature scheme the key is meant for.
    pub scheme: Option<String>,
    /// Envelope JSON bytes.
    pub value: Vec<u8>,
}

/// Outer JSON shape of a [`KeyRecord`].
#[derive(Serialize, Deserialize)]
struct RecordDocument {
    keytype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
    keyval: serde_json::Value,
}

impl KeyRecord {
    /// A record without a scheme.
    pub fn new(key_type: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key_type: key_type.into(),
            scheme: None,
            value: value.into(),
        }
    }

    /// Set the scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Parse the `{"keytype", "scheme", "keyval"}` document form.
    pub fn from_json(bytes: &[u8]) -> Result<Self, KeyError> {
        check_size(bytes.len())?;
        let document: RecordDocument = serde_json::from_slice(bytes)?;
        Ok(Self {
            key_type: document.keytype,
            scheme: document.scheme,
            value: serde_json::to_vec(&document.keyval)?,
        })
    }

    /// Serialize to the `{"keytype", "scheme", "keyval"}` document form.
    pub fn to_json(&self) -> Result<Vec<u8>, KeyError> {
        check_size(self.value.len())?;
        let document = RecordDocument {
            keytype: self.key_type.clone(),
            scheme: self.scheme.clone(),
            keyval: serde_json::from_slice(&self.value)?,
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}

impl std::fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRecord")
            .field("key_type", &self.key_type)
            .field("scheme", &self.scheme)
            .field("value", &format_args!("<{} bytes>", self.value.len()))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct Envelope {
    #[serde(with = "base64_bytes")]
    public: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_secret")]
    private: Option<Zeroizing<Vec<u8>>>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(de::Error::custom)
    }
}

mod base64_secret {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S: Serializer>(
        bytes: &Option<Zeroizing<Vec<u8>>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => {
                let encoded = Zeroizing::new(STANDARD.encode(bytes.as_slice()));
                serializer.serialize_some(encoded.as_str())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Zeroizing<Vec<u8>>>, D::Error> {
        let Some(encoded) = Option::<String>::deserialize(deserializer)?.map(Zeroizing::new) else {
            return Ok(None);
        };
        STANDARD
            .decode(encoded.as_bytes())
            .map(|bytes| Some(Zeroizing::new(bytes)))
            .map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a record that is expected to hold a private key.
///
/// A record without a private component still decodes, to its public key;
/// callers that require secret material check [`Key::is_private`].
pub fn decode_private_key(record: &KeyRecord) -> Result<Key, KeyError> {
    decode(record, "private")
}

/// Decode a record that is expected to hold a public key.
///
/// Runs the same validation as [`decode_private_key`], so a record that
/// also carries a private component must be consistent.
pub fn decode_public_key(record: &KeyRecord) -> Result<Key, KeyError> {
    decode(record, "public")
}

fn decode(record: &KeyRecord, role: &'static str) -> Result<Key, KeyError> {
    check_size(record.value.len())?;
    let envelope: Envelope = serde_json::from_slice(&record.value).map_err(|e| {
        // Parser messages can quote input bytes, so only the failure is logged.
        tracing::debug!(key_type = %record.key_type, role, "malformed key envelope");
        KeyError::Malformed(e)
    })?;

    let result = match record.key_type.parse::<KeyType>() {
        Ok(KeyType::Ed25519) => decode_ed25519(&envelope),
        Ok(KeyType::EcdsaSha2Nistp256) => decode_ecdsa(EcdsaCurve::P256, &envelope),
        Ok(KeyType::RsassaPssSha256) | Err(_) => {
            Err(KeyError::UnsupportedKeyType(record.key_type.clone()))
        }
    };
    if let Err(e) = &result {
        tracing::debug!(key_type = %record.key_type, role, error = %e, "rejected key record");
    }
    result
}

fn check_size(size: usize) -> Result<(), KeyError> {
    if size > MAX_KEY_INPUT_SIZE {
        return Err(KeyError::TooLarge {
            size,
            limit: MAX_KEY_INPUT_SIZE,
        });
    }
    Ok(())
}

fn is_low_order(public: &[u8]) -> bool {
    ED25519_LOW_ORDER_POINTS
        .iter()
        .any(|point| bool::from(point.as_slice().ct_eq(public)))
}

fn decode_ed25519(envelope: &Envelope) -> Result<Key, KeyError> {
    if envelope.public.len() != ED25519_PUBLIC_KEY_SIZE {
        return Err(KeyError::InvalidLength {
            what: "ed25519 public key",
            expected: ED25519_PUBLIC_KEY_SIZE,
            actual: envelope.public.len(),
        });
    }
    if is_low_order(&envelope.public) {
        return Err(KeyError::LowOrderPoint);
    }
    let public = Ed25519PublicKey::from_bytes(&envelope.public)?;

    let Some(private) = &envelope.private else {
        return Ok(Key::Ed25519Public(public));
    };
    // Checks the length and that the embedded suffix matches the seed.
    let private = Ed25519PrivateKey::from_keypair_bytes(private)?;
    let derived = private.public_key();
    if !bool::from(derived.as_bytes().as_slice().ct_eq(public.as_bytes().as_slice())) {
        return Err(KeyError::KeyMismatch);
    }
    Ok(Key::Ed25519Private(private))
}

fn decode_ecdsa(curve: EcdsaCurve, envelope: &Envelope) -> Result<Key, KeyError> {
    let public = EcdsaPublicKey::from_sec1_bytes(curve, &envelope.public)?;

    let Some(private) = &envelope.private else {
        return Ok(Key::EcdsaPublic(public));
    };
    let private = EcdsaPrivateKey::from_scalar_bytes(curve, private)?;
    let derived = private.public_key().to_sec1_bytes(false);
    let declared = public.to_sec1_bytes(false);
    if !bool::from(derived.as_slice().ct_eq(declared.as_slice())) {
        return Err(KeyError::KeyMismatch);
    }
    Ok(Key::EcdsaPrivate(private))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a key as a record. Private keys carry both components; ECDSA
/// points are written uncompressed.
///
/// Fails with [`KeyError::UnsupportedKeyType`] for P-384 keys, which have no
/// record type.
pub fn encode_key(key: &Key) -> Result<KeyRecord, KeyError> {
    let Some(key_type) = KeyType::of(key) else {
        return Err(KeyError::UnsupportedKeyType(key.describe()));
    };
    let envelope = match key {
        Key::Ed25519Public(pk) => Envelope {
            public: pk.as_bytes().to_vec(),
            private: None,
        },
        Key::Ed25519Private(sk) => Envelope {
            public: sk.public_key().as_bytes().to_vec(),
            private: Some(Zeroizing::new(sk.to_keypair_bytes().to_vec())),
        },
        Key::EcdsaPublic(pk) => Envelope {
            public: pk.to_sec1_bytes(false),
            private: None,
        },
        Key::EcdsaPrivate(sk) => Envelope {
            public: sk.public_key().to_sec1_bytes(false),
            private: Some(sk.to_scalar_bytes()),
        },
    };
    Ok(KeyRecord::new(key_type.as_str(), serde_json::to_vec(&envelope)?)
        .with_scheme(key_type.scheme()))
}
