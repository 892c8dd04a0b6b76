// src/models/lock.rs
//! Public and private views of a lock.
//!
//! A lock is split in two so the signing key can never ride along with the
//! data handed to verifiers:
//! - [`LockHandle`]: identifier, label and trusted public key
//! - [`LockSecret`]: identifier and private key, owned by the creating authority

use crate::wallet::key_management::{PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

/// Registry-assigned lock identifier. Assignment starts at 1.
pub type LockId = u64;

/// Everything a verifier needs to know about a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHandle {
    pub lock_id: LockId,
    /// Human-readable name, e.g. "Front Door"
    pub label: String,
    pub public_key: PublicKey,
}

/// The signing half of a lock.
#[derive(Debug)]
pub struct LockSecret {
    pub lock_id: LockId,
    pub private_key: PrivateKey,
}
