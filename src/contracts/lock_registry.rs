// src/contracts/lock_registry.rs
//! Lock registry: the authoritative ledger of lock ownership.
//!
//! Tracks, per lock:
//! - the owning authority's address
//! - the public key verifiers should trust
//! - the set of revoked credential signatures
//!
//! One registry is shared by every authority and lock in a process through
//! an `Arc<LockRegistry>`. All state sits behind a single `RwLock`: each
//! mutation holds the write lock across its check and its update, while
//! lookups share the read lock.

use crate::error::RegistryError;
use crate::models::identity::Address;
use crate::models::lock::LockId;
use crate::wallet::key_management::PublicKey;
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone)]
struct LockRecord {
    owner: Address,
    public_key: PublicKey,
    revoked_signatures: HashSet<String>,
}

#[derive(Debug)]
struct RegistryState {
    next_lock_id: LockId,
    locks: HashMap<LockId, LockRecord>,
}

/// Shared ledger of locks, owners, keys and revocations.
#[derive(Debug)]
pub struct LockRegistry {
    state: RwLock<RegistryState>,
}

/// Serializable copy of the full registry state.
///
/// Nothing else survives a restart, so this is everything an integrator has
/// to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub next_lock_id: LockId,
    pub public_keys: BTreeMap<LockId, PublicKey>,
    pub owners: BTreeMap<LockId, Address>,
    pub revoked_signatures: BTreeMap<LockId, BTreeSet<String>>,
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LockRegistry {
    /// Creates an empty registry. The first registered lock gets id 1.
    pub fn new() -> Self {
        LockRegistry {
            state: RwLock::new(RegistryState {
                next_lock_id: 1,
                locks: HashMap::new(),
            }),
        }
    }

    /// Records a new lock and returns its id.
    ///
    /// # Arguments
    /// * `public_key` - Key verifiers should trust for this lock
    /// * `owner` - Address allowed to revoke and transfer
    ///
    /// # Returns
    /// The assigned id. Ids increase strictly and are never handed out twice,
    /// even under concurrent registration.
    ///
    /// # Errors
    /// - `IdsExhausted` once the counter has reached `LockId::MAX`
    /// - `IdInUse` if the counter points at an assigned id; the existing
    ///   record is left untouched
    pub fn register_lock(&self, public_key: PublicKey, owner: Address) -> Result<LockId, RegistryError> {
        let mut state = self.state.write();
        let lock_id = state.next_lock_id;
        let next_lock_id = lock_id.checked_add(1).ok_or_else(|| {
            warn!("lock id counter exhausted");
            RegistryError::IdsExhausted
        })?;

        match state.locks.entry(lock_id) {
            Entry::Occupied(_) => return Err(RegistryError::IdInUse(lock_id)),
            Entry::Vacant(slot) => {
                slot.insert(LockRecord {
                    owner: owner.clone(),
                    public_key,
                    revoked_signatures: HashSet::new(),
                });
            }
        }
        state.next_lock_id = next_lock_id;

        info!("registered lock {lock_id} for {owner}");
        Ok(lock_id)
    }

    /// Looks up the public key currently trusted for `lock_id`.
    ///
    /// # Returns
    /// A copy of the key; `NotFound` if the lock is unknown
    pub fn fetch_public_key(&self, lock_id: LockId) -> Result<PublicKey, RegistryError> {
        self.state
            .read()
            .locks
            .get(&lock_id)
            .map(|record| record.public_key.clone())
            .ok_or(RegistryError::NotFound(lock_id))
    }

    /// Adds `signature` to the lock's revoked set.
    ///
    /// Revoking an already revoked signature succeeds without change.
    ///
    /// # Arguments
    /// * `lock_id` - Lock whose revoked set grows
    /// * `signature` - Encoded signature text, stored as given
    /// * `caller` - Address asking for the revocation
    ///
    /// # Errors
    /// - `NotFound` if the lock is unknown
    /// - `Unauthorized` if `caller` is not the lock's owner; nothing changes
    pub fn revoke_signature(
        &self,
        lock_id: LockId,
        signature: &str,
        caller: &Address,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let record = state
            .locks
            .get_mut(&lock_id)
            .ok_or(RegistryError::NotFound(lock_id))?;

        if &record.owner != caller {
            warn!("rejected revocation on lock {lock_id} from non-owner {caller}");
            return Err(RegistryError::Unauthorized {
                lock_id,
                caller: caller.clone(),
            });
        }

        if record.revoked_signatures.insert(signature.to_owned()) {
            info!("revoked a signature on lock {lock_id}");
        } else {
            debug!("signature on lock {lock_id} was already revoked");
        }
        Ok(())
    }

    /// Returns the lock's current revoked-signature set, possibly empty.
    pub fn fetch_revoked_signatures(&self, lock_id: LockId) -> Result<HashSet<String>, RegistryError> {
        self.state
            .read()
            .locks
            .get(&lock_id)
            .map(|record| record.revoked_signatures.clone())
            .ok_or(RegistryError::NotFound(lock_id))
    }

    /// Hands the lock to `new_owner`.
    ///
    /// # Arguments
    /// * `lock_id` - Lock to transfer
    /// * `current_owner` - Caller, checked against the recorded owner
    /// * `new_owner` - Address that gains revoke and transfer rights
    ///
    /// # Errors
    /// - `NotFound` if the lock is unknown
    /// - `Unauthorized` if `current_owner` is not the recorded owner
    pub fn transfer_ownership(
        &self,
        lock_id: LockId,
        current_owner: &Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let record = state
            .locks
            .get_mut(&lock_id)
            .ok_or(RegistryError::NotFound(lock_id))?;

        if &record.owner != current_owner {
            warn!("rejected transfer of lock {lock_id} from non-owner {current_owner}");
            return Err(RegistryError::Unauthorized {
                lock_id,
                caller: current_owner.clone(),
            });
        }

        info!("lock {lock_id} transferred from {current_owner} to {new_owner}");
        record.owner = new_owner;
        Ok(())
    }

    /// `true` if `address` currently owns `lock_id`. Unknown locks have no owner.
    pub fn is_owner(&self, address: &Address, lock_id: LockId) -> bool {
        self.state
            .read()
            .locks
            .get(&lock_id)
            .is_some_and(|record| &record.owner == address)
    }

    /// Current owner of `lock_id`, or `NotFound` for an unknown lock.
    pub fn owner_of(&self, lock_id: LockId) -> Result<Address, RegistryError> {
        self.state
            .read()
            .locks
            .get(&lock_id)
            .map(|record| record.owner.clone())
            .ok_or(RegistryError::NotFound(lock_id))
    }

    /// Number of registered locks.
    pub fn lock_count(&self) -> usize {
        self.state.read().locks.len()
    }

    /// Copies the whole registry state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        let mut snapshot = RegistrySnapshot {
            next_lock_id: state.next_lock_id,
            public_keys: BTreeMap::new(),
            owners: BTreeMap::new(),
            revoked_signatures: BTreeMap::new(),
        };
        for (&lock_id, record) in &state.locks {
            snapshot.public_keys.insert(lock_id, record.public_key.clone());
            snapshot.owners.insert(lock_id, record.owner.clone());
            snapshot
                .revoked_signatures
                .insert(lock_id, record.revoked_signatures.iter().cloned().collect());
        }
        snapshot
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// # Errors
    /// `CorruptSnapshot` if the maps disagree on which locks exist, a lock id
    /// or the counter is 0, or the id counter would hand out an id already in
    /// use. A counter at `LockId::MAX` is accepted; registering against it
    /// fails with `IdsExhausted`.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self, RegistryError> {
        let RegistrySnapshot {
            next_lock_id,
            public_keys,
            mut owners,
            mut revoked_signatures,
        } = snapshot;

        if next_lock_id == 0 {
            return Err(RegistryError::CorruptSnapshot("id counter starts at 1".into()));
        }

        let mut locks = HashMap::with_capacity(public_keys.len());
        for (lock_id, public_key) in public_keys {
            if lock_id == 0 {
                return Err(RegistryError::CorruptSnapshot("lock id 0 is never assigned".into()));
            }
            if lock_id >= next_lock_id {
                return Err(RegistryError::CorruptSnapshot(format!(
                    "lock {lock_id} is not below the id counter {next_lock_id}"
                )));
            }
            let owner = owners.remove(&lock_id).ok_or_else(|| {
                RegistryError::CorruptSnapshot(format!("lock {lock_id} has no owner"))
            })?;
            let revoked = revoked_signatures
                .remove(&lock_id)
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();
            locks.insert(
                lock_id,
                LockRecord {
                    owner,
                    public_key,
                    revoked_signatures: revoked,
                },
            );
        }

        if let Some(lock_id) = owners.keys().chain(revoked_signatures.keys()).next() {
            return Err(RegistryError::CorruptSnapshot(format!(
                "lock {lock_id} has no public key"
            )));
        }

        debug!("restored registry with {} locks", locks.len());
        Ok(LockRegistry {
            state: RwLock::new(RegistryState {
                next_lock_id,
                locks,
            }),
        })
    }
}
