//! Encrypted Vault keys storage for Brokkr
//!
//! This crate persists a cluster's Vault unseal/root secrets in object
//! storage so later provisioning runs can recover them:
//! - **Encryption**: client-side AES-CFB with armored (hex/JSON) envelopes
//! - **Compatibility**: keyfiles written at the legacy 8-bit feedback
//!   segment width stay readable indefinitely
//! - **Storage**: S3-compatible backends behind the [`ObjectStore`] trait,
//!   plus an in-memory backend for tests
//!
//! Keys are supplied by the caller; this crate never generates, stores, or
//! rotates key material.

// Core modules
pub mod crypto;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use crypto::{decrypt, encrypt, SegmentWidth};
pub use storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};
pub use store::{key_path, VaultKeysStore};
pub use types::{S3StoreConfig, VaultKeys};

use brokkr_core::Result;
use serde_json::Value;

/// Convenience function: fetch and decrypt an environment's Vault keys.
pub async fn get_vault_keys<S: ObjectStore>(
    store: S,
    bucket: impl Into<String>,
    environment: &str,
    key: &[u8],
) -> Result<Option<VaultKeys>> {
    VaultKeysStore::new(store, bucket).read(environment, key).await
}

/// Convenience function: sanitize, encrypt, and store an environment's
/// Vault keys.
pub async fn put_vault_keys<S: ObjectStore>(
    store: S,
    bucket: impl Into<String>,
    environment: &str,
    vault_keys: &Value,
    key: &[u8],
) -> Result<()> {
    VaultKeysStore::new(store, bucket)
        .write(environment, vault_keys, key)
        .await
}
