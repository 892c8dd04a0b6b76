// src/main.rs

//! # Lock Credential System - Demo Entry Point
//!
//! Walks through the credential lifecycle against an in-process registry:
//! 1. An authority registers a lock
//! 2. It issues a credential for hashed holder metadata
//! 3. The holder presents it, the authority revokes it, the lock refuses it
//! 4. A replacement credential is issued and accepted
//! 5. Extra locks are registered with keys generated on worker threads
//!
//! Settings come from [`vc_lock::config::Settings`].

use anyhow::Context;
use futures::future::join_all;
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;
use vc_lock::config::Settings;
use vc_lock::{Authority, Holder, KeyPair, LockRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    env_logger::Builder::new()
        .parse_filters(&settings.log_level)
        .init();

    let registry = Arc::new(LockRegistry::new());
    let mut authority = Authority::new(Arc::clone(&registry));
    let mut holder = Holder::new();

    let mut lock = authority
        .register_new_lock(settings.lock_label.as_str())
        .context("registering lock")?;
    println!("Registered lock {} ({})", lock.id(), lock.label());

    let metadata = json!({ "email": settings.holder_email });
    let first = authority
        .issue_credential(lock.id(), &metadata, "first key")
        .context("issuing first credential")?;
    holder.store(first.clone());
    println!("First credential accepted: {}", holder.present(&lock));

    authority
        .revoke_credential_by_signature(lock.id(), &first.signature)
        .context("revoking first credential")?;
    if !lock.refresh_revocations() {
        warn!("lock {} could not refresh its revocations", lock.id());
    }
    println!("First credential after revocation: {}", holder.present(&lock));

    let second = authority
        .issue_credential(lock.id(), &metadata, "second key")
        .context("issuing second credential")?;
    holder.store(second);
    println!("Replacement credential accepted: {}", holder.present(&lock));

    // Key generation is the slow part; run it off the async workers.
    let key_jobs = (0..settings.bulk_locks).map(|_| tokio::task::spawn_blocking(KeyPair::generate));
    for (n, key_pair) in join_all(key_jobs).await.into_iter().enumerate() {
        let key_pair = key_pair.context("key generation task failed")?;
        let extra = authority
            .register_lock_with_keys(format!("Extra {}", n + 1), key_pair)
            .context("registering extra lock")?;
        info!("registered extra lock {}", extra.id());
    }
    println!("Registry now holds {} locks", registry.lock_count());

    Ok(())
}
