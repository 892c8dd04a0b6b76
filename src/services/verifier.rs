// src/services/verifier.rs
//! Lock-side credential verification.
//!
//! A [`Lock`] decides whether a presented credential opens it. It keeps a
//! local copy of its trusted public key and of the revoked signatures it has
//! seen; both are pulled from the shared registry on explicit refresh.
//! Callers that need up-to-date revocation must call
//! [`Lock::refresh_revocations`] before verifying.

use crate::contracts::lock_registry::LockRegistry;
use crate::error::RegistryError;
use crate::models::credential::Credential;
use crate::models::lock::{LockHandle, LockId};
use crate::utils::crypto;
use crate::wallet::key_management::PublicKey;
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// A verifier bound to one lock id.
#[derive(Debug, Clone)]
pub struct Lock {
    handle: LockHandle,
    registry: Arc<LockRegistry>,
    /// Only ever grows
    revoked: HashSet<String>,
}

impl Lock {
    /// Creates a verifier trusting `handle.public_key`, with no known revocations.
    pub fn new(handle: LockHandle, registry: Arc<LockRegistry>) -> Self {
        Lock {
            handle,
            registry,
            revoked: HashSet::new(),
        }
    }

    /// Builds a verifier from the registry's current key and revoked set.
    ///
    /// # Arguments
    /// * `lock_id` - Registered lock to bind to
    /// * `label` - Local name; the registry stores no labels
    /// * `registry` - Shared registry used for later refreshes
    ///
    /// # Errors
    /// `RegistryError::NotFound` if the lock was never registered.
    pub fn connect(
        lock_id: LockId,
        label: impl Into<String>,
        registry: Arc<LockRegistry>,
    ) -> Result<Self, RegistryError> {
        let public_key = registry.fetch_public_key(lock_id)?;
        let revoked = registry.fetch_revoked_signatures(lock_id)?;
        Ok(Lock {
            handle: LockHandle {
                lock_id,
                label: label.into(),
                public_key,
            },
            registry,
            revoked,
        })
    }

    /// Registry id this verifier is bound to.
    pub fn id(&self) -> LockId {
        self.handle.lock_id
    }

    /// Human-readable name given at registration or connect time.
    pub fn label(&self) -> &str {
        &self.handle.label
    }

    /// Key currently trusted for signature checks. Changes only on
    /// [`refresh_public_key`](Self::refresh_public_key).
    pub fn public_key(&self) -> &PublicKey {
        &self.handle.public_key
    }

    /// Public description of the lock: id, label and trusted key.
    pub fn handle(&self) -> &LockHandle {
        &self.handle
    }

    /// Number of revoked signatures in the local cache.
    pub fn revoked_count(&self) -> usize {
        self.revoked.len()
    }

    /// Decides whether `credential` currently opens this lock.
    ///
    /// # Process Flow
    /// 1. Rejects a missing credential or one issued for another lock
    /// 2. Rejects a signature in the local revocation cache
    /// 3. Checks the signature over the holder data hash with the trusted key
    ///
    /// # Returns
    /// `true` only if every step passes. Never fails: every rejection is just
    /// `false`, with no reason given.
    pub fn verify(&self, credential: Option<&Credential>) -> bool {
        let Some(credential) = credential else {
            debug!("lock {}: no credential presented", self.id());
            return false;
        };

        if credential.lock_id != self.id() {
            debug!(
                "lock {}: credential is for lock {}",
                self.id(),
                credential.lock_id
            );
            return false;
        }

        if self.revoked.contains(&credential.signature) {
            debug!("lock {}: credential has been revoked", self.id());
            return false;
        }

        crypto::verify(
            &credential.holder_data_hash,
            &credential.signature,
            &self.handle.public_key,
        )
    }

    /// Re-reads the trusted public key from the registry.
    ///
    /// Returns `false`, keeping the cached key, if the registry does not know
    /// this lock.
    pub fn refresh_public_key(&mut self) -> bool {
        match self.registry.fetch_public_key(self.id()) {
            Ok(public_key) => {
                self.handle.public_key = public_key;
                true
            }
            Err(err) => {
                warn!("lock {}: public key refresh failed: {err}", self.id());
                false
            }
        }
    }

    /// Merges the registry's revoked signatures into the local cache.
    ///
    /// Entries are never dropped locally, even if the registry's set shrank.
    /// Returns `false` if the registry does not know this lock.
    pub fn refresh_revocations(&mut self) -> bool {
        match self.registry.fetch_revoked_signatures(self.id()) {
            Ok(revoked) => {
                self.revoked.extend(revoked);
                true
            }
            Err(err) => {
                warn!("lock {}: revocation refresh failed: {err}", self.id());
                false
            }
        }
    }
}
