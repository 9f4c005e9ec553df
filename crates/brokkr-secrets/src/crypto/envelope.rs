//! Armored encryption and decryption of a secret under a caller key
//!
//! `encrypt` is the single write path and always uses the 128-bit segment
//! width. `decrypt` takes the width as a parameter so the store layer can
//! retry legacy envelopes at the 8-bit width.

use brokkr_core::{Error, Result};
use rand::Rng;
use zeroize::Zeroizing;

use crate::crypto::cipher::{self, SegmentWidth, BLOCK_SIZE, IV_SIZE};
use crate::crypto::{armor, padding};

/// Key lengths accepted by the cipher (AES-128/192/256)
const VALID_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Reject keys that are not 16, 24, or 32 bytes before any crypto work.
fn validate_key(key: &[u8]) -> Result<()> {
    if !VALID_KEY_LENGTHS.contains(&key.len()) {
        return Err(Error::invalid_key_length(key.len()));
    }
    Ok(())
}

/// Generate a random 16-byte initialization vector.
///
/// Drawn fresh from the thread-local CSPRNG on every call; never reused.
fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt a secret under `key` and return the armored envelope.
///
/// Generates a fresh IV, pads the secret to the AES block size, encrypts
/// at the 128-bit segment width, and wraps the result. Two calls with the
/// same inputs produce different envelopes.
pub fn encrypt(secret: &[u8], key: &[u8]) -> Result<String> {
    validate_key(key)?;

    let iv = generate_iv();
    let padded = Zeroizing::new(padding::pad(secret, BLOCK_SIZE));
    let ciphertext = cipher::encrypt(&padded, &iv, key, SegmentWidth::Bits128)?;

    Ok(armor::wrap(&iv, &ciphertext))
}

/// Decrypt an armored envelope under `key` at the given segment width.
///
/// Trailing NUL bytes are stripped as padding; see
/// [`padding::unpad`](crate::crypto::padding::unpad) for the limitation
/// this implies.
pub fn decrypt(armor_text: &str, key: &[u8], segment: SegmentWidth) -> Result<Vec<u8>> {
    validate_key(key)?;

    let (iv, payload) = armor::unwrap(armor_text)?;
    let padded = Zeroizing::new(cipher::decrypt(&payload, &iv, key, segment)?);

    Ok(padding::unpad(&padded).to_vec())
}
