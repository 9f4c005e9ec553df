//! Object store trait and implementations

pub mod memory;
pub mod s3;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for object storage backends
///
/// The store layer consumes this seam and nothing else; it never creates
/// buckets. Backend failures are surfaced unchanged through `anyhow`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check whether a bucket exists and is accessible
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Fetch an object body
    ///
    /// Returns Ok(Some(bytes)) if the object exists
    /// Returns Ok(None) if the object does not exist
    /// Returns Err for any other backend failure
    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>>;

    /// Create or overwrite an object
    async fn put(&self, bucket: &str, path: &str, body: Vec<u8>) -> Result<()>;
}

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
