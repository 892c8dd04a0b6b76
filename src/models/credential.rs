// src/models/credential.rs
//! Lock access credential data model.

use crate::models::lock::LockId;
use serde::{Deserialize, Serialize};

/// A signed binding of hashed holder data to one lock.
///
/// The holder's metadata itself never appears here; only its digest does.
/// Whether the credential grants access is decided at every verification,
/// against the lock's current key and revocation set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Lock this credential opens
    pub lock_id: LockId,

    /// Canonical base64 SHA-256 digest of the holder metadata
    pub holder_data_hash: String,

    /// Nickname for display, e.g. "Alice's key". Not covered by the signature.
    pub label: String,

    /// Canonical base64 signature over the raw digest bytes
    pub signature: String,
}
