// src/models/identity.rs
//! Authority identities.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an authority, used only for ownership checks.
///
/// Random addresses look like `0x` followed by 40 lowercase hex characters.
/// They are not derived from, or bound to, any signing key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps an existing identity string.
    pub fn new(value: impl Into<String>) -> Self {
        Address(value.into())
    }

    /// Generates a fresh random address.
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Address(format!("0x{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
