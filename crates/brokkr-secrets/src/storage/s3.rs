//! S3 object store backend
//!
//! Supports AWS S3 and S3-compatible storage (MinIO, Wasabi, DigitalOcean
//! Spaces) via a custom endpoint.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::storage::ObjectStore;
use crate::types::S3StoreConfig;

/// S3 implementation of [`ObjectStore`]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a backend from configuration
    pub async fn new(config: &S3StoreConfig) -> Result<Self> {
        let client = Self::create_client(&config.region, config.endpoint.as_deref()).await?;
        Ok(Self { client })
    }

    /// Create a backend from an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create an S3 client with the given region and optional endpoint
    async fn create_client(region: &str, endpoint: Option<&str>) -> Result<Client> {
        let region = Region::new(region.to_string());

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        // Configure custom endpoint for S3-compatible storage
        if let Some(endpoint_url) = endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint_url);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true); // Required for MinIO and many S3-compatible services
        }

        Ok(Client::from_conf(s3_config_builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => {
                debug!("Bucket {} is accessible", bucket);
                Ok(true)
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    debug!("Bucket {} does not exist", bucket);
                    Ok(false)
                } else {
                    Err(anyhow!("Failed to check bucket {}: {}", bucket, service_error))
                }
            }
        }
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        debug!("Downloading object: s3://{}/{}", bucket, path);

        let resp = match self
            .client
            .get_object()
            .bucket(bucket)
            .key(path)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    debug!("Object does not exist: s3://{}/{}", bucket, path);
                    return Ok(None);
                }
                return Err(anyhow!(
                    "Failed to get object s3://{}/{}: {}",
                    bucket,
                    path,
                    service_error
                ));
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .context("Failed to read response body")?;

        let data = body.into_bytes().to_vec();
        debug!("Downloaded {} bytes from s3://{}/{}", data.len(), bucket, path);

        Ok(Some(data))
    }

    async fn put(&self, bucket: &str, path: &str, body: Vec<u8>) -> Result<()> {
        debug!("Uploading object ({} bytes): s3://{}/{}", body.len(), bucket, path);

        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .server_side_encryption(ServerSideEncryption::Aes256) // SSE-S3
            .send()
            .await
            .with_context(|| format!("Failed to put object s3://{}/{}", bucket, path))?;

        info!("Uploaded object to s3://{}/{}", bucket, path);
        Ok(())
    }
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore").finish_non_exhaustive()
    }
}
