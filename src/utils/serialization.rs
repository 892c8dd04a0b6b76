// src/utils/serialization.rs
//! Serialization utilities for credentials and signatures.
//!
//! Provides:
//! - Strict canonical base64 text encoding for digests, signatures and keys
//! - Canonical byte forms of holder metadata

use serde::Serialize;

/// Encodes bytes as standard, padded base64.
pub fn encode(bytes: &[u8]) -> String {
    base64::encode(bytes)
}

/// Decodes base64 text, rejecting anything that is not its canonical form.
///
/// Returns `None` when [`is_canonical`] fails, so callers never see bytes
/// recovered from padded, truncated or garbage-suffixed text.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    let bytes = base64::decode(text).ok()?;
    (encode(&bytes) == text).then_some(bytes)
}

/// Returns `true` only if `text` is the unique canonical encoding of its bytes.
///
/// # Process Flow
/// 1. Rejects any character outside the standard alphabet (`A-Z a-z 0-9 + / =`)
/// 2. Decodes the text
/// 3. Re-encodes the decoded bytes and compares with the input
///
/// Lenient decoders accept missing padding, trailing garbage or non-zero
/// trailing bits without changing the decoded bytes. All of those fail here.
pub fn is_canonical(text: &str) -> bool {
    let in_alphabet = text
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=');
    in_alphabet && decode(text).is_some()
}

/// Types that reduce to a well-defined byte sequence for digesting.
///
/// The digest stored in a credential is computed over these bytes, so two
/// values that are semantically equal must produce identical output.
pub trait CanonicalBytes {
    fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error>;
}

/// Any serializable value: converted to a JSON value first (object keys come
/// out sorted), then written as compact JSON.
impl<T: Serialize + ?Sized> CanonicalBytes for T {
    fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        serde_json::to_vec(&value)
    }
}
