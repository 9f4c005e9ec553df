//! Armored envelope for ciphertext at rest
//!
//! The envelope is a JSON object with exactly two fields, `iv` and
//! `payload`, each the lower-case hex encoding of raw bytes. This is the
//! wire format of every keyfile already in storage, so field names and
//! encoding are frozen.

use brokkr_core::{Error, Result};
use serde::Deserialize;

/// On-wire shape of an armored envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    iv: String,
    payload: String,
}

/// Wrap an IV and ciphertext into armor text.
pub fn wrap(iv: &[u8], payload: &[u8]) -> String {
    serde_json::json!({
        "iv": hex::encode(iv),
        "payload": hex::encode(payload),
    })
    .to_string()
}

/// Unwrap armor text into its (iv, payload) byte sequences.
///
/// Fails with [`Error::MalformedEnvelope`] when the text is not a JSON
/// object, when either field is absent, or when either field is not valid
/// hex.
pub fn unwrap(armor: &str) -> Result<(Vec<u8>, Vec<u8>)> {
    let envelope: Envelope =
        serde_json::from_str(armor).map_err(|e| Error::malformed_envelope(e.to_string()))?;

    let iv = hex::decode(&envelope.iv)
        .map_err(|e| Error::malformed_envelope(format!("`iv` is not valid hex: {e}")))?;
    let payload = hex::decode(&envelope.payload)
        .map_err(|e| Error::malformed_envelope(format!("`payload` is not valid hex: {e}")))?;

    Ok((iv, payload))
}
