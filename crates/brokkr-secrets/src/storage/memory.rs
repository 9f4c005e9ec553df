//! In-memory object store
//!
//! Backing double for the store tests and for downstream callers that need
//! an [`ObjectStore`] without network access. Buckets are registered
//! explicitly; this backend, like the real one, never creates them on the
//! fly.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::storage::ObjectStore;

/// In-memory implementation of [`ObjectStore`]
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: Mutex<HashSet<String>>,
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty store with no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given bucket already registered
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        let store = Self::new();
        store.create_bucket(bucket);
        store
    }

    /// Register a bucket
    pub fn create_bucket(&self, bucket: impl Into<String>) {
        self.buckets.lock().unwrap().insert(bucket.into());
    }

    /// Number of stored objects across all buckets
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.buckets.lock().unwrap().contains(bucket))
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        if !self.buckets.lock().unwrap().contains(bucket) {
            return Err(anyhow!("no such bucket: {}", bucket));
        }

        let objects = self.objects.lock().unwrap();
        Ok(objects
            .get(&(bucket.to_string(), path.to_string()))
            .cloned())
    }

    async fn put(&self, bucket: &str, path: &str, body: Vec<u8>) -> Result<()> {
        if !self.buckets.lock().unwrap().contains(bucket) {
            return Err(anyhow!("no such bucket: {}", bucket));
        }

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryObjectStore::with_bucket("bkt");

        assert!(store.bucket_exists("bkt").await.unwrap());
        assert!(!store.bucket_exists("other").await.unwrap());

        assert_eq!(store.get("bkt", "a/b").await.unwrap(), None);

        store.put("bkt", "a/b", b"body".to_vec()).await.unwrap();
        assert_eq!(store.get("bkt", "a/b").await.unwrap(), Some(b"body".to_vec()));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_bucket_is_an_error() {
        let store = MemoryObjectStore::new();

        assert!(store.get("missing", "a").await.is_err());
        assert!(store.put("missing", "a", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryObjectStore::with_bucket("bkt");

        store.put("bkt", "k", b"first".to_vec()).await.unwrap();
        store.put("bkt", "k", b"second".to_vec()).await.unwrap();

        assert_eq!(store.get("bkt", "k").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.object_count(), 1);
    }
}
