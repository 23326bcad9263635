//! # Hashing Utilities
//!
//! SHA-256 is the only hash in Starchain. Block digests, linkage, and
//! lookups by hash all use it, so wallets and explorers that already speak
//! SHA-256 can recompute a digest without pulling in anything exotic.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash as a fixed-size array.
///
/// Block digests are stored as `[u8; 32]`.
///
/// # Example
///
/// ```
/// use starchain_protocol::crypto::sha256_array;
///
/// let hash = sha256_array(b"starchain");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Parse a hex digest into a 32-byte array.
///
/// Returns `None` for anything that is not exactly 64 hex characters.
/// Lookups treat a malformed digest the same as an unknown one.
pub fn parse_digest_hex(s: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(s.trim()).ok()?;
    bytes.try_into().ok()
}
