// src/services/credential_issuer.rs
//! Credential Issuer Service
//!
//! An [`Authority`] owns locks and issues credentials for them:
//! - Lock creation: generate a keypair, register the public half
//! - Issuance: digest the holder's metadata and sign the digest
//! - Revocation: publish a credential's signature to the registry
//!
//! Private keys live only inside the authority that generated them.

use crate::contracts::lock_registry::LockRegistry;
use crate::error::AuthorityError;
use crate::models::credential::Credential;
use crate::models::identity::Address;
use crate::models::lock::{LockHandle, LockId, LockSecret};
use crate::services::verifier::Lock;
use crate::utils::crypto;
use crate::utils::serialization::CanonicalBytes;
use crate::wallet::key_management::KeyPair;
use log::{debug, info, warn};
use std::sync::Arc;

#[derive(Debug)]
struct OwnedLock {
    handle: LockHandle,
    secret: LockSecret,
}

/// A lock owner.
#[derive(Debug)]
pub struct Authority {
    address: Address,
    registry: Arc<LockRegistry>,
    locks: Vec<OwnedLock>,
    issued: Vec<Credential>,
}

impl Authority {
    /// Creates an authority with a fresh random address.
    pub fn new(registry: Arc<LockRegistry>) -> Self {
        Authority {
            address: Address::random(),
            registry,
            locks: Vec::new(),
            issued: Vec::new(),
        }
    }

    /// Address the registry records as owner of this authority's locks.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Public handles of every lock this authority created.
    pub fn locks(&self) -> impl Iterator<Item = &LockHandle> {
        self.locks.iter().map(|owned| &owned.handle)
    }

    /// Credentials issued for `lock_id` and not revoked through this authority.
    pub fn issued_credentials(&self, lock_id: LockId) -> impl Iterator<Item = &Credential> {
        self.issued
            .iter()
            .filter(move |credential| credential.lock_id == lock_id)
    }

    /// Creates a lock with a newly generated keypair.
    ///
    /// Key generation dominates the cost; use
    /// [`register_lock_with_keys`](Self::register_lock_with_keys) to generate
    /// keys elsewhere when registering many locks.
    ///
    /// # Errors
    /// `Registry` if the registry cannot assign an id
    pub fn register_new_lock(&mut self, label: impl Into<String>) -> Result<Lock, AuthorityError> {
        self.register_lock_with_keys(label, KeyPair::generate())
    }

    /// Registers a lock using a keypair generated by the caller.
    ///
    /// The public key and this authority's address go to the registry; the
    /// private key stays here.
    ///
    /// # Arguments
    /// * `label` - Human-readable name for the lock
    /// * `key_pair` - Keys for the lock; the private half never leaves this authority
    ///
    /// # Returns
    /// A verifier for the new lock
    ///
    /// # Errors
    /// `Registry` if the registry cannot assign an id; nothing is recorded here
    pub fn register_lock_with_keys(
        &mut self,
        label: impl Into<String>,
        key_pair: KeyPair,
    ) -> Result<Lock, AuthorityError> {
        let KeyPair {
            public_key,
            private_key,
        } = key_pair;

        let lock_id = self
            .registry
            .register_lock(public_key.clone(), self.address.clone())?;
        let handle = LockHandle {
            lock_id,
            label: label.into(),
            public_key,
        };
        info!("{} created lock {} ({})", self.address, lock_id, handle.label);

        self.locks.push(OwnedLock {
            handle: handle.clone(),
            secret: LockSecret {
                lock_id,
                private_key,
            },
        });
        Ok(Lock::new(handle, Arc::clone(&self.registry)))
    }

    /// Issues a credential binding the digest of `metadata` to `lock_id`.
    ///
    /// Only this authority's own bookkeeping decides whether it may issue; the
    /// registry's current owner is not consulted. `metadata` is digested here
    /// and not kept.
    ///
    /// # Arguments
    /// * `lock_id` - A lock this authority created
    /// * `metadata` - Holder data; only its digest ends up in the credential
    /// * `label` - Free-form name stored on the credential
    ///
    /// # Errors
    /// - `LockNotFound` if this authority did not create `lock_id`
    /// - `Serialization` if `metadata` has no canonical byte form
    /// - `Crypto` if signing fails
    pub fn issue_credential<M>(
        &mut self,
        lock_id: LockId,
        metadata: &M,
        label: impl Into<String>,
    ) -> Result<Credential, AuthorityError>
    where
        M: CanonicalBytes + ?Sized,
    {
        let owned = self
            .locks
            .iter()
            .find(|owned| owned.secret.lock_id == lock_id)
            .ok_or(AuthorityError::LockNotFound(lock_id))?;

        let bytes = metadata.canonical_bytes()?;
        let signed = crypto::sign(&bytes, &owned.secret.private_key)?;

        let credential = Credential {
            lock_id,
            holder_data_hash: signed.digest,
            label: label.into(),
            signature: signed.signature,
        };
        self.issued.push(credential.clone());
        debug!("issued credential {:?} for lock {lock_id}", credential.label);
        Ok(credential)
    }

    /// Revokes the credential issued for `lock_id` with `signature`.
    ///
    /// The registry is updated first. The local record is dropped only once
    /// the registry has accepted the revocation, so a rejected revocation
    /// (for example after the lock was transferred away) leaves the
    /// credential listed here.
    ///
    /// This order is a deliberate change from removing the local record
    /// before the registry call. In that order a refused revocation left the
    /// credential gone from this authority while it stayed valid at every
    /// lock, and nothing restored the record.
    ///
    /// # Errors
    /// - `CredentialNotFound` if no such credential was issued here
    /// - `Registry` if the registry refuses, e.g. `Unauthorized`
    pub fn revoke_credential_by_signature(
        &mut self,
        lock_id: LockId,
        signature: &str,
    ) -> Result<(), AuthorityError> {
        let index = self
            .issued
            .iter()
            .position(|credential| credential.lock_id == lock_id && credential.signature == signature)
            .ok_or(AuthorityError::CredentialNotFound { lock_id })?;

        if let Err(err) = self
            .registry
            .revoke_signature(lock_id, signature, &self.address)
        {
            warn!("{} could not revoke on lock {lock_id}: {err}", self.address);
            return Err(err.into());
        }

        let revoked = self.issued.remove(index);
        info!("revoked credential {:?} on lock {lock_id}", revoked.label);
        Ok(())
    }

    /// Transfers registry ownership of `lock_id` to `new_owner`.
    ///
    /// The private key stays here, so this authority can still issue for the
    /// lock but can no longer revoke.
    ///
    /// # Errors
    /// `Registry` with `NotFound` or `Unauthorized` from the registry
    pub fn transfer_lock(&self, lock_id: LockId, new_owner: Address) -> Result<(), AuthorityError> {
        self.registry
            .transfer_ownership(lock_id, &self.address, new_owner)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use serde_json::json;

    fn setup() -> (Arc<LockRegistry>, Authority) {
        let registry = Arc::new(LockRegistry::new());
        let authority = Authority::new(Arc::clone(&registry));
        (registry, authority)
    }

    #[test]
    fn test_register_new_lock() {
        let (registry, mut authority) = setup();
        let lock = authority.register_new_lock("Front Door").unwrap();

        assert_eq!(lock.id(), 1);
        assert_eq!(lock.label(), "Front Door");
        assert!(registry.is_owner(authority.address(), lock.id()));
        assert_eq!(&registry.fetch_public_key(lock.id()).unwrap(), lock.public_key());
        assert_eq!(authority.locks().count(), 1);
    }

    #[test]
    fn test_issue_and_verify() {
        let (_registry, mut authority) = setup();
        let lock = authority.register_new_lock("Front Door").unwrap();
        let credential = authority
            .issue_credential(lock.id(), &json!({"email": "a@b.com"}), "Alice")
            .unwrap();

        assert_eq!(credential.lock_id, lock.id());
        assert_eq!(credential.label, "Alice");
        assert!(!credential.holder_data_hash.contains("a@b.com"));
        assert!(lock.verify(Some(&credential)));
        assert_eq!(authority.issued_credentials(lock.id()).count(), 1);
    }

    #[test]
    fn test_holder_hash_is_digest_of_canonical_metadata() {
        let (_registry, mut authority) = setup();
        let lock = authority.register_new_lock("Front Door").unwrap();
        let credential = authority
            .issue_credential(lock.id(), &json!({"email": "a@b.com"}), "Alice")
            .unwrap();

        let expected = crate::utils::serialization::encode(&crypto::hash_data(
            br#"{"email":"a@b.com"}"#,
        ));
        assert_eq!(credential.holder_data_hash, expected);
    }

    #[test]
    fn test_issue_for_foreign_lock() {
        let (registry, mut alice) = setup();
        let mut bob = Authority::new(Arc::clone(&registry));
        let bobs_lock = bob.register_new_lock("Garage").unwrap();

        let result = alice.issue_credential(bobs_lock.id(), &json!({}), "x");
        assert!(matches!(result, Err(AuthorityError::LockNotFound(id)) if id == bobs_lock.id()));
    }

    #[test]
    fn test_revoke_unknown_signature() {
        let (_registry, mut authority) = setup();
        let lock = authority.register_new_lock("Front Door").unwrap();
        let credential = authority
            .issue_credential(lock.id(), &json!({"email": "a@b.com"}), "Alice")
            .unwrap();

        let result = authority.revoke_credential_by_signature(lock.id(), "bm90IGEgc2ln");
        assert!(matches!(result, Err(AuthorityError::CredentialNotFound { .. })));

        let result = authority.revoke_credential_by_signature(lock.id() + 1, &credential.signature);
        assert!(matches!(result, Err(AuthorityError::CredentialNotFound { .. })));
    }

    #[test]
    fn test_revoke_publishes_to_registry() {
        let (registry, mut authority) = setup();
        let mut lock = authority.register_new_lock("Front Door").unwrap();
        let credential = authority
            .issue_credential(lock.id(), &json!({"email": "a@b.com"}), "Alice")
            .unwrap();

        authority
            .revoke_credential_by_signature(lock.id(), &credential.signature)
            .unwrap();

        assert!(registry
            .fetch_revoked_signatures(lock.id())
            .unwrap()
            .contains(&credential.signature));
        assert_eq!(authority.issued_credentials(lock.id()).count(), 0);
        assert!(lock.refresh_revocations());
        assert!(!lock.verify(Some(&credential)));

        // A second attempt finds nothing locally.
        assert!(authority
            .revoke_credential_by_signature(lock.id(), &credential.signature)
            .is_err());
    }

    #[test]
    fn test_rejected_revocation_keeps_local_record() {
        let (registry, mut authority) = setup();
        let buyer = Authority::new(Arc::clone(&registry));
        let lock = authority.register_new_lock("Front Door").unwrap();
        let credential = authority
            .issue_credential(lock.id(), &json!({"email": "a@b.com"}), "Alice")
            .unwrap();

        authority
            .transfer_lock(lock.id(), buyer.address().clone())
            .unwrap();

        let result = authority.revoke_credential_by_signature(lock.id(), &credential.signature);
        assert!(matches!(
            result,
            Err(AuthorityError::Registry(RegistryError::Unauthorized { .. }))
        ));
        assert_eq!(authority.issued_credentials(lock.id()).count(), 1);
        assert!(registry.fetch_revoked_signatures(lock.id()).unwrap().is_empty());
    }

    #[test]
    fn test_transfer_requires_ownership() {
        let (registry, authority) = setup();
        let mut owner = Authority::new(Arc::clone(&registry));
        let lock = owner.register_new_lock("Front Door").unwrap();

        let result = authority.transfer_lock(lock.id(), authority.address().clone());
        assert!(matches!(
            result,
            Err(AuthorityError::Registry(RegistryError::Unauthorized { .. }))
        ));
        assert!(registry.is_owner(owner.address(), lock.id()));
    }

    #[test]
    fn test_register_with_pregenerated_keys() {
        let (registry, mut authority) = setup();
        let keys = KeyPair::generate();
        let expected = keys.public_key.clone();
        let lock = authority.register_lock_with_keys("Back Door", keys).unwrap();

        assert_eq!(lock.public_key(), &expected);
        assert_eq!(registry.fetch_public_key(lock.id()).unwrap(), expected);
    }

    #[test]
    fn test_register_fails_cleanly_when_ids_run_out() {
        let mut snapshot = LockRegistry::new().snapshot();
        snapshot.next_lock_id = LockId::MAX;
        let registry = Arc::new(LockRegistry::from_snapshot(snapshot).unwrap());
        let mut authority = Authority::new(Arc::clone(&registry));

        let result = authority.register_new_lock("Front Door");
        assert!(matches!(
            result,
            Err(AuthorityError::Registry(RegistryError::IdsExhausted))
        ));
        assert_eq!(authority.locks().count(), 0);
        assert_eq!(registry.lock_count(), 0);
    }
}
