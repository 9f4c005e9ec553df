//! Block alignment for the AES-CFB keyfile format
//!
//! The stored format pads plaintext with NUL bytes up to the next cipher
//! block boundary and strips trailing NULs after decryption. An input that
//! is already aligned gains a full extra block, so the pad is always
//! 1..=block_size bytes.

/// Extend `plaintext` with NUL bytes to the next multiple of `block_size`.
///
/// The input is not mutated.
pub fn pad(plaintext: &[u8], block_size: usize) -> Vec<u8> {
    let pad_size = block_size - (plaintext.len() % block_size);

    let mut padded = Vec::with_capacity(plaintext.len() + pad_size);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + pad_size, 0);
    padded
}

/// Strip trailing NUL bytes from a decrypted buffer.
///
/// The pad carries no length marker, so trailing NULs that belong to the
/// plaintext itself are stripped along with the pad. Callers must not store
/// payloads ending in NUL bytes; every envelope already in circulation uses
/// this scheme, so it is kept as-is for read compatibility.
pub fn unpad(padded: &[u8]) -> &[u8] {
    let end = padded
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |pos| pos + 1);

    &padded[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 16;

    #[test]
    fn test_pad_unaligned_input() {
        let padded = pad(b"vault-keys", BLOCK);
        assert_eq!(padded.len(), BLOCK);
        assert_eq!(&padded[..10], b"vault-keys");
        assert!(padded[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_aligned_input_gains_full_block() {
        let aligned = vec![0x41; BLOCK];
        let padded = pad(&aligned, BLOCK);
        assert_eq!(padded.len(), 2 * BLOCK);
        assert!(padded[BLOCK..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_empty_input() {
        let padded = pad(b"", BLOCK);
        assert_eq!(padded.len(), BLOCK);
        assert!(padded.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unpad_reverses_pad() {
        let padded = pad(b"root-token", BLOCK);
        assert_eq!(unpad(&padded), b"root-token");
    }

    #[test]
    fn test_unpad_all_zero_buffer() {
        assert_eq!(unpad(&[0u8; 32]), b"");
    }

    #[test]
    fn test_unpad_strips_plaintext_trailing_nuls() {
        // Known limitation of the format: NULs belonging to the plaintext
        // are indistinguishable from the pad.
        let padded = pad(b"token\x00\x00", BLOCK);
        assert_eq!(unpad(&padded), b"token");
    }
}
