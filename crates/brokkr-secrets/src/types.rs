//! Core types for Vault keys storage

use brokkr_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bundle fields required for storage, in validation order
const REQUIRED_FIELDS: [&str; 3] = ["root_token", "keys", "keys_base64"];

/// The credential bundle produced by Vault initialization
///
/// Exactly three fields are stored; anything else a caller hands over is
/// dropped during [`sanitize`](VaultKeys::sanitize).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultKeys {
    /// Root token for the initialized Vault
    pub root_token: String,
    /// Unseal key shares
    pub keys: Vec<String>,
    /// Unseal key shares, base64-encoded
    pub keys_base64: Vec<String>,
}

impl VaultKeys {
    /// Check and re-encapsulate a loosely-shaped Vault keys document.
    ///
    /// Fails with [`Error::MissingField`] if any required field is absent
    /// and with [`Error::CorruptBundle`] if a present field has the wrong
    /// shape. Extra fields are silently dropped.
    pub fn sanitize(bundle: &Value) -> Result<Self> {
        for field in REQUIRED_FIELDS {
            if bundle.get(field).is_none() {
                return Err(Error::missing_field(field));
            }
        }

        serde_json::from_value(bundle.clone()).map_err(Error::CorruptBundle)
    }

    /// Serialize the bundle to its stored JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl std::fmt::Debug for VaultKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKeys")
            .field("root_token", &"[REDACTED]")
            .field("keys", &format!("[REDACTED; {}]", self.keys.len()))
            .field(
                "keys_base64",
                &format!("[REDACTED; {}]", self.keys_base64.len()),
            )
            .finish()
    }
}

/// S3 object store configuration
///
/// The shape the outer tooling loads from its config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StoreConfig {
    /// Bucket holding the environment keyfiles
    pub bucket: String,
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom S3-compatible endpoint (optional)
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
        }
    }
}
