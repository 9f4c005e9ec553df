//! Client-side encryption for stored Vault keyfiles
//!
//! The keyfile at rest is an armored AES-CFB envelope:
//!
//! 1. Pad the serialized bundle with NULs to the AES block size
//! 2. Encrypt under a caller-supplied key with a fresh random IV
//!    (CFB mode, 128-bit feedback segment)
//! 3. Wrap IV + ciphertext as hex fields of a JSON envelope
//!
//! Decryption runs the same steps in reverse. Envelopes written by earlier
//! tooling used an 8-bit feedback segment; [`SegmentWidth`] keeps both
//! widths decryptable. Confidentiality only: the envelope carries no
//! authentication tag.
//!
//! Keys are supplied by the caller; nothing in this module generates or
//! persists key material.

pub mod armor;
pub mod cipher;
pub mod envelope;
pub mod padding;

pub use cipher::{SegmentWidth, BLOCK_SIZE, IV_SIZE};
pub use envelope::{decrypt, encrypt};
