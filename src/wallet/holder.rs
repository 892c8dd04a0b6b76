// src/wallet/holder.rs
//! Holder-side credential storage.
//!
//! A [`Holder`] keeps at most one credential per lock. Storing a credential
//! for a lock that already has one discards the old credential. This is the
//! only place the one-credential-per-lock rule is enforced: an authority may
//! issue any number of valid credentials for the same lock.

use crate::models::credential::Credential;
use crate::models::lock::LockId;
use crate::services::verifier::Lock;
use std::collections::HashMap;

/// A user's credential wallet.
#[derive(Debug, Default, Clone)]
pub struct Holder {
    credentials: HashMap<LockId, Credential>,
}

impl Holder {
    /// Creates an empty wallet.
    pub fn new() -> Self {
        Holder {
            credentials: HashMap::new(),
        }
    }

    /// Stores `credential`, replacing any credential already held for its lock.
    ///
    /// # Returns
    /// The discarded credential, if there was one. The holder keeps no copy.
    pub fn store(&mut self, credential: Credential) -> Option<Credential> {
        self.credentials.insert(credential.lock_id, credential)
    }

    /// Credential currently held for `lock_id`, if any.
    pub fn credential_for(&self, lock_id: LockId) -> Option<&Credential> {
        self.credentials.get(&lock_id)
    }

    /// Removes the credential for `lock_id`. Returns `true` if one was removed.
    pub fn remove_credential_for(&mut self, lock_id: LockId) -> bool {
        self.credentials.remove(&lock_id).is_some()
    }

    /// Presents the stored credential for `lock` and reports whether it opened.
    ///
    /// # Arguments
    /// * `lock` - Verifier to present to; its cached revocations are used as is
    ///
    /// # Returns
    /// `false` when nothing is held for the lock or the lock rejects the credential
    pub fn present(&self, lock: &Lock) -> bool {
        lock.verify(self.credential_for(lock.id()))
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }
}
