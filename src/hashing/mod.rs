//! BLAKE3 helpers for content addressing.
//!
//! The embedding cache keys entries by [`hash_text`]; the stub embedder buckets tokens with
//! [`hash_to_u64`].

/// Full 256-bit BLAKE3 digest of `text`.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// First 8 bytes of the BLAKE3 digest as a little-endian `u64`.
///
/// Used for feature buckets only; cache keys use the full [`hash_text`] digest.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
