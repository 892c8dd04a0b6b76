// src/wallet/key_management.rs
//! Key material for lock signing keys.
//!
//! Every lock gets its own secp256k1 keypair (via the `k256` crate):
//! - [`PrivateKey`] stays with the authority that created the lock
//! - [`PublicKey`] is published to the registry and trusted by verifiers
//!
//! Public keys travel as canonical base64 of the compressed SEC1 point.

use crate::error::CryptoError;
use crate::utils::serialization::{decode, encode};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A lock's verification key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    key: VerifyingKey,
}

/// A lock's signing key.
///
/// Does not implement `Serialize` or `Clone`, and its `Debug` output is
/// redacted.
pub struct PrivateKey {
    key: SigningKey,
}

/// Freshly generated keypair for one lock.
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    /// Generates a new keypair from the operating system RNG.
    ///
    /// This is the only expensive step in registering a lock; callers
    /// creating many locks can run it on worker threads.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_key = PublicKey {
            key: signing_key.verifying_key().clone(),
        };
        KeyPair {
            public_key,
            private_key: PrivateKey { key: signing_key },
        }
    }
}

impl PublicKey {
    /// Parses a public key from its encoded text form.
    ///
    /// # Errors
    /// `CryptoError::InvalidKey` if the text is not canonical base64 or does
    /// not hold a valid point on the curve.
    pub fn from_encoded(text: &str) -> Result<Self, CryptoError> {
        let bytes = decode(text)
            .ok_or_else(|| CryptoError::InvalidKey("public key is not canonical base64".into()))?;
        let key = VerifyingKey::from_sec1_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("public key is not a curve point: {e}")))?;
        let parsed = PublicKey { key };
        // Uncompressed points decode too; only the compressed form is accepted.
        if parsed.to_encoded() != text {
            return Err(CryptoError::InvalidKey(
                "public key is not in compressed form".into(),
            ));
        }
        Ok(parsed)
    }

    /// Canonical text form of the key.
    pub fn to_encoded(&self) -> String {
        encode(self.key.to_encoded_point(true).as_bytes())
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }
}

impl PrivateKey {
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_encoded())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_encoded())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_encoded())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_encoded(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_distinct() {
        let first = KeyPair::generate();
        let second = KeyPair::generate();
        assert_ne!(first.public_key, second.public_key);
    }

    #[test]
    fn test_public_key_text_round_trip() {
        let pair = KeyPair::generate();
        let text = pair.public_key.to_encoded();
        // 33-byte compressed point
        assert_eq!(text.len(), 44);
        assert_eq!(PublicKey::from_encoded(&text).unwrap(), pair.public_key);
    }

    #[test]
    fn test_rejects_unusable_public_keys() {
        assert!(matches!(
            PublicKey::from_encoded("not a key"),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            PublicKey::from_encoded(&encode(&[2u8; 10])),
            Err(CryptoError::InvalidKey(_))
        ));

        let pair = KeyPair::generate();
        let uncompressed = encode(pair.public_key.key.to_encoded_point(false).as_bytes());
        assert!(PublicKey::from_encoded(&uncompressed).is_err());
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let pair = KeyPair::generate();
        assert_eq!(format!("{:?}", pair.private_key), "PrivateKey(..)");
    }

    #[test]
    fn test_public_key_serde() {
        let pair = KeyPair::generate();
        let json = serde_json::to_string(&pair.public_key).unwrap();
        assert_eq!(json, format!("\"{}\"", pair.public_key.to_encoded()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair.public_key);
    }
}
