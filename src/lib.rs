// src/lib.rs

//! # Lock Credential System
//!
//! Hash-based access credentials for locks. An authority issues a credential
//! that binds a digest of a holder's metadata to one lock; the lock checks the
//! signature without ever seeing the metadata. A shared registry records who
//! owns each lock, which public key to trust, and which signatures are revoked.
//!
//! ## Architecture Overview
//! 1. **Codec** (`utils`): canonical base64, SHA-256, ECDSA sign/verify
//! 2. **Registry** (`contracts`): the shared ledger of locks
//! 3. **Services** (`services`): the lock verifier and the issuing authority
//! 4. **Wallet** (`wallet`): key material and the holder's credential store
//!
//! ```no_run
//! use std::sync::Arc;
//! use vc_lock::{Authority, Holder, LockRegistry};
//!
//! let registry = Arc::new(LockRegistry::new());
//! let mut authority = Authority::new(Arc::clone(&registry));
//! let lock = authority.register_new_lock("Front Door")?;
//!
//! let metadata = serde_json::json!({"email": "a@b.com"});
//! let credential = authority.issue_credential(lock.id(), &metadata, "Alice")?;
//!
//! let mut holder = Holder::new();
//! holder.store(credential);
//! assert!(holder.present(&lock));
//! # Ok::<(), vc_lock::error::AuthorityError>(())
//! ```

pub mod config;
pub mod contracts;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod wallet;

pub use contracts::lock_registry::{LockRegistry, RegistrySnapshot};
pub use models::credential::Credential;
pub use models::identity::Address;
pub use models::lock::{LockHandle, LockId, LockSecret};
pub use services::credential_issuer::Authority;
pub use services::verifier::Lock;
pub use wallet::holder::Holder;
pub use wallet::key_management::{KeyPair, PrivateKey, PublicKey};
