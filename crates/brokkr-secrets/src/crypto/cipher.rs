//! AES-CFB keystream application for the stored keyfile format
//!
//! Confidentiality-only: output is the same length as the input and carries
//! no authentication tag. A corrupted payload decrypts to garbage without
//! error; the store layer detects this when the result fails to parse.

use aes::{Aes128, Aes192, Aes256};
use brokkr_core::{Error, Result};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Initialization vector size in bytes
pub const IV_SIZE: usize = 16;

type Cfb128Enc<C> = cfb_mode::Encryptor<C>;
type Cfb128Dec<C> = cfb_mode::Decryptor<C>;
type Cfb8Enc<C> = cfb8::Encryptor<C>;
type Cfb8Dec<C> = cfb8::Decryptor<C>;

/// CFB feedback segment width
///
/// Envelopes written today use the 128-bit width. The 8-bit width exists
/// only to read envelopes written by earlier tooling generations; stored
/// objects are never migrated in place, so both stay supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentWidth {
    /// Full-block feedback (current format)
    #[default]
    Bits128,
    /// Byte-at-a-time feedback (legacy format, read-only compatibility)
    Bits8,
}

impl std::fmt::Display for SegmentWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentWidth::Bits128 => write!(f, "128"),
            SegmentWidth::Bits8 => write!(f, "8"),
        }
    }
}

/// Encrypt `plaintext` under (key, iv) at the given segment width.
///
/// The AES variant is selected by key length (16/24/32 bytes). The IV must
/// be [`IV_SIZE`] bytes.
pub fn encrypt(
    plaintext: &[u8],
    iv: &[u8],
    key: &[u8],
    segment: SegmentWidth,
) -> Result<Vec<u8>> {
    let mut buf = plaintext.to_vec();

    // Key length is matched first, so a constructor failure can only mean
    // a bad IV length.
    match (segment, key.len()) {
        (SegmentWidth::Bits128, 16) => Cfb128Enc::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (SegmentWidth::Bits128, 24) => Cfb128Enc::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (SegmentWidth::Bits128, 32) => Cfb128Enc::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (SegmentWidth::Bits8, 16) => Cfb8Enc::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (SegmentWidth::Bits8, 24) => Cfb8Enc::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (SegmentWidth::Bits8, 32) => Cfb8Enc::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .encrypt(&mut buf),
        (_, length) => return Err(Error::invalid_key_length(length)),
    }

    Ok(buf)
}

/// Decrypt `ciphertext` under (key, iv) at the given segment width.
pub fn decrypt(
    ciphertext: &[u8],
    iv: &[u8],
    key: &[u8],
    segment: SegmentWidth,
) -> Result<Vec<u8>> {
    let mut buf = ciphertext.to_vec();

    match (segment, key.len()) {
        (SegmentWidth::Bits128, 16) => Cfb128Dec::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (SegmentWidth::Bits128, 24) => Cfb128Dec::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (SegmentWidth::Bits128, 32) => Cfb128Dec::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (SegmentWidth::Bits8, 16) => Cfb8Dec::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (SegmentWidth::Bits8, 24) => Cfb8Dec::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (SegmentWidth::Bits8, 32) => Cfb8Dec::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::invalid_iv(IV_SIZE, iv.len()))?
            .decrypt(&mut buf),
        (_, length) => return Err(Error::invalid_key_length(length)),
    }

    Ok(buf)
}
