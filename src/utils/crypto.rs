// src/utils/crypto.rs
//! Digest, signing and verification for credentials.
//!
//! - SHA-256 digests (via `ring`)
//! - ECDSA over secp256k1 (via `k256`), signing the digest as a prehash
//! - Deterministic RFC 6979 nonces, low-S normalized, 64-byte `r || s`
//!
//! Every digest and signature leaves this module as canonical base64, and
//! [`verify`] refuses anything that is not.

use crate::error::CryptoError;
use crate::utils::serialization::{decode, encode, is_canonical};
use crate::wallet::key_management::{PrivateKey, PublicKey};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::Signature;
use ring::digest::{digest, SHA256};

/// Length of a raw digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of a raw compact signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Canonically encoded output of [`sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDigest {
    pub digest: String,
    pub signature: String,
}

/// Computes the SHA-256 digest of `data`.
pub fn hash_data(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(digest(&SHA256, data).as_ref());
    out
}

/// Digests `message` and signs the digest with `private_key`.
///
/// # Arguments
/// * `message` - Bytes to digest and sign
/// * `private_key` - Signing half of a lock's keypair
///
/// # Returns
/// The encoded digest and the encoded 64-byte signature over it
///
/// # Errors
/// `CryptoError::Signing` if the signing primitive rejects the input.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Result<SignedDigest, CryptoError> {
    let hash = hash_data(message);
    let signature: Signature = private_key
        .signing_key()
        .sign_prehash(&hash)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    Ok(SignedDigest {
        digest: encode(&hash),
        signature: encode(&signature.to_bytes()),
    })
}

/// Checks `signature` over the raw bytes of `digest` against `public_key`.
///
/// Total over all string inputs: anything malformed is simply `false`.
/// Canonical form is checked before any cryptography runs.
///
/// # Arguments
/// * `digest` - Canonical base64 of exactly 32 bytes
/// * `signature` - Canonical base64 of a 64-byte compact signature
/// * `public_key` - Key the signature must verify under
pub fn verify(digest: &str, signature: &str, public_key: &PublicKey) -> bool {
    if !is_canonical(digest) || !is_canonical(signature) {
        return false;
    }

    let (Some(digest_bytes), Some(signature_bytes)) = (decode(digest), decode(signature)) else {
        return false;
    };
    if digest_bytes.len() != DIGEST_LEN || signature_bytes.len() != SIGNATURE_LEN {
        return false;
    }

    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return false;
    };

    public_key
        .verifying_key()
        .verify_prehash(&digest_bytes, &signature)
        .is_ok()
}
