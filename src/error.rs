// src/error.rs
//! Error types for the lock credential system.
//!
//! Malformed signatures or digests are never errors: verification absorbs
//! them into a `false` result. The variants here cover caller misuse
//! (unknown locks, unknown credentials) and authorization violations.

use crate::models::identity::Address;
use crate::models::lock::LockId;
use thiserror::Error;

/// Failures reported by the lock registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The referenced lock was never registered.
    #[error("lock {0} is not registered")]
    NotFound(LockId),

    /// The caller is not the recorded owner of the lock.
    #[error("{caller} is not the owner of lock {lock_id}")]
    Unauthorized { lock_id: LockId, caller: Address },

    /// The id counter has reached `LockId::MAX`; no further lock can be registered.
    #[error("lock ids are exhausted")]
    IdsExhausted,

    /// The counter pointed at an id that is already assigned.
    #[error("lock id {0} is already assigned")]
    IdInUse(LockId),

    /// A snapshot handed to `LockRegistry::from_snapshot` is inconsistent.
    #[error("corrupt registry snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Key handling and signing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material that cannot be used for the requested operation.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The signing primitive itself failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Failures reported by an [`Authority`](crate::services::credential_issuer::Authority).
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The lock is not one this authority created.
    #[error("lock {0} is not held by this authority")]
    LockNotFound(LockId),

    /// No credential with that signature was issued for the lock.
    #[error("no issued credential with that signature for lock {lock_id}")]
    CredentialNotFound { lock_id: LockId },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Holder metadata could not be reduced to canonical bytes.
    #[error("metadata serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
