//! # Block Structure
//!
//! A block is one tamper-evident record in the registry. Each block carries
//! an encoded payload, its position in the chain, the digest of its
//! predecessor, and its own digest.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Block                                      │
//! │  ├── height: u64          (genesis = 0)     │
//! │  ├── timestamp: u64       (unix seconds)    │
//! │  ├── previous_hash: Option<[u8; 32]>        │
//! │  ├── body: String         (hex(JSON))       │
//! │  └── hash: [u8; 32]       (SHA-256)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Digest Preimage
//!
//! The hash covers every field except itself, in this exact order:
//!
//! ```text
//! "starchain/block/v1"
//! || height            (u64 LE)
//! || timestamp         (u64 LE)
//! || 0x00                              when previous_hash is absent
//!  | 0x01 || previous_hash (32 bytes)  when present
//! || body length       (u64 LE)
//! || body              (UTF-8 bytes)
//! ```
//!
//! Changing this layout invalidates every digest already on a chain.
//!
//! ## Pending vs. finalized
//!
//! Callers only ever build a [`PendingBlock`]: a payload with no height,
//! timestamp, link, or digest. The chain store turns it into a [`Block`]
//! inside its append path, so a half-assigned block never exists outside the
//! store's write lock.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BLOCK_DIGEST_DOMAIN, GENESIS_MARKER};
use crate::crypto::hash::sha256_array;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Errors decoding or encoding a block body.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("block body is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("block body is not a valid payload record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Celestial coordinates and story of a registered star.
///
/// The field set is closed: a star carrying any other field is rejected
/// rather than stored without it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Star {
    /// Declination, e.g. `68° 52' 56.9`.
    pub dec: String,
    /// Right ascension, e.g. `16h 29m 1.0s`.
    pub ra: String,
    /// Free-form story told by the owner.
    pub story: String,
    /// Magnitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<String>,
    /// Constellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cen: Option<String>,
}

impl Star {
    /// A star with the three required fields.
    pub fn new(dec: impl Into<String>, ra: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            dec: dec.into(),
            ra: ra.into(),
            story: story.into(),
            mag: None,
            cen: None,
        }
    }
}

/// A star bound to the address that proved ownership of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub star: Star,
    pub owner: String,
}

/// Decoded form of a block body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockPayload {
    /// A registered star.
    Star(StarRecord),
    /// The fixed genesis marker, `{"data": "Genesis Block"}`.
    Genesis { data: String },
}

impl BlockPayload {
    /// The genesis marker payload.
    pub fn genesis() -> Self {
        BlockPayload::Genesis {
            data: GENESIS_MARKER.to_string(),
        }
    }

    /// Returns the star record, or `None` for the genesis marker.
    pub fn into_star(self) -> Option<StarRecord> {
        match self {
            BlockPayload::Star(record) => Some(record),
            BlockPayload::Genesis { .. } => None,
        }
    }

    /// Encode as a block body: hex of the JSON serialization.
    pub fn encode(&self) -> Result<String, PayloadError> {
        Ok(hex::encode(serde_json::to_vec(self)?))
    }
}

// ---------------------------------------------------------------------------
// PendingBlock
// ---------------------------------------------------------------------------

/// A block that has a payload but no place in the chain yet.
///
/// Only [`ChainStore::append`](super::chain::ChainStore::append) can turn it
/// into a [`Block`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingBlock {
    body: String,
}

impl PendingBlock {
    /// Encode `payload` into a pending block. Touches no chain state.
    pub fn new(payload: &BlockPayload) -> Result<Self, PayloadError> {
        Ok(Self {
            body: payload.encode()?,
        })
    }

    /// The pending genesis block.
    pub fn genesis() -> Self {
        let json = format!("{{\"data\":\"{}\"}}", GENESIS_MARKER);
        Self {
            body: hex::encode(json),
        }
    }

    /// The encoded body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Finalize with chain-assigned fields. Crate-private: the store is the
    /// only caller.
    pub(crate) fn finalize(
        self,
        height: u64,
        timestamp: u64,
        previous_hash: Option<[u8; 32]>,
    ) -> Block {
        let mut block = Block {
            height,
            timestamp,
            previous_hash,
            body: self.body,
            hash: [0u8; 32],
        };
        block.hash = block.compute_hash();
        block
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A finalized, hash-linked block.
///
/// The chain store owns every stored block; callers receive clones. Editing a
/// clone is harmless to the chain but will, correctly, make
/// [`validate_self`](Self::validate_self) report it as tampered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Zero-based position in the chain.
    pub height: u64,
    /// Unix seconds at append time. Not required to be monotonic.
    pub timestamp: u64,
    /// Digest of the block at `height - 1`. `None` for genesis.
    pub previous_hash: Option<[u8; 32]>,
    /// Hex-encoded JSON payload.
    pub body: String,
    /// SHA-256 over the preimage described in the module docs.
    pub hash: [u8; 32],
}

impl Block {
    /// Deterministic digest preimage over every field except `hash`.
    pub fn digest_input(&self) -> Vec<u8> {
        let mut preimage =
            Vec::with_capacity(BLOCK_DIGEST_DOMAIN.len() + 8 + 8 + 33 + 8 + self.body.len());
        preimage.extend_from_slice(BLOCK_DIGEST_DOMAIN);
        preimage.extend_from_slice(&self.height.to_le_bytes());
        preimage.extend_from_slice(&self.timestamp.to_le_bytes());
        match &self.previous_hash {
            Some(prev) => {
                preimage.push(0x01);
                preimage.extend_from_slice(prev);
            }
            None => preimage.push(0x00),
        }
        preimage.extend_from_slice(&(self.body.len() as u64).to_le_bytes());
        preimage.extend_from_slice(self.body.as_bytes());
        preimage
    }

    /// Recompute the digest from the current field values.
    pub fn compute_hash(&self) -> [u8; 32] {
        sha256_array(&self.digest_input())
    }

    /// `true` when the stored hash still matches the block's content.
    pub fn validate_self(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Decode the body back into its structured payload.
    pub fn decode_payload(&self) -> Result<BlockPayload, PayloadError> {
        let bytes = hex::decode(&self.body)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The block hash as a hex string.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// The previous hash as a hex string, if any.
    pub fn previous_hash_hex(&self) -> Option<String> {
        self.previous_hash.map(hex::encode)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn star_payload(owner: &str) -> BlockPayload {
        BlockPayload::Star(StarRecord {
            star: Star::new("68° 52' 56.9", "16h 29m 1.0s", "first light"),
            owner: owner.to_string(),
        })
    }

    #[test]
    fn genesis_body_decodes_to_marker() {
        let block = PendingBlock::genesis().finalize(0, 1_700_000_000, None);
        assert_eq!(block.decode_payload().unwrap(), BlockPayload::genesis());
        assert!(block.decode_payload().unwrap().into_star().is_none());
    }

    #[test]
    fn genesis_body_matches_encoded_marker() {
        let encoded = BlockPayload::genesis().encode().unwrap();
        assert_eq!(PendingBlock::genesis().body(), encoded);
    }

    #[test]
    fn star_payload_round_trips_through_body() {
        let payload = star_payload("addr-a");
        let block = PendingBlock::new(&payload).unwrap().finalize(1, 10, Some([7u8; 32]));
        assert_eq!(block.decode_payload().unwrap(), payload);
    }

    #[test]
    fn optional_star_fields_are_omitted_when_absent() {
        let body = star_payload("x").encode().unwrap();
        let json = String::from_utf8(hex::decode(body).unwrap()).unwrap();
        assert!(!json.contains("mag"));
        assert!(!json.contains("cen"));
    }

    #[test]
    fn star_with_unknown_field_is_rejected() {
        let json = r#"{"dec":"1","ra":"2","story":"s","color":"blue"}"#;
        assert!(serde_json::from_str::<Star>(json).is_err());

        let full = r#"{"dec":"1","ra":"2","story":"s","mag":"4.2","cen":"Lyra"}"#;
        let star: Star = serde_json::from_str(full).unwrap();
        assert_eq!(star.cen.as_deref(), Some("Lyra"));
    }

    #[test]
    fn body_with_unknown_star_field_does_not_decode() {
        let mut block = PendingBlock::new(&star_payload("a")).unwrap().finalize(1, 1, None);
        block.body = hex::encode(r#"{"star":{"dec":"1","ra":"2","story":"s","x":1},"owner":"a"}"#);
        assert!(matches!(block.decode_payload(), Err(PayloadError::Json(_))));
    }

    #[test]
    fn finalized_block_validates() {
        let block = PendingBlock::new(&star_payload("a"))
            .unwrap()
            .finalize(3, 99, Some([1u8; 32]));
        assert!(block.validate_self());
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn digest_is_deterministic() {
        let a = PendingBlock::genesis().finalize(0, 42, None);
        let b = PendingBlock::genesis().finalize(0, 42, None);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn every_field_feeds_the_digest() {
        let base = PendingBlock::new(&star_payload("a"))
            .unwrap()
            .finalize(1, 100, Some([2u8; 32]));

        let mut m = base.clone();
        m.height = 2;
        assert!(!m.validate_self());

        let mut m = base.clone();
        m.timestamp = 101;
        assert!(!m.validate_self());

        let mut m = base.clone();
        m.previous_hash = Some([3u8; 32]);
        assert!(!m.validate_self());

        let mut m = base.clone();
        m.previous_hash = None;
        assert!(!m.validate_self());

        let mut m = base.clone();
        m.body = star_payload("b").encode().unwrap();
        assert!(!m.validate_self());

        let mut m = base;
        m.hash[0] ^= 0xFF;
        assert!(!m.validate_self());
    }

    #[test]
    fn absent_and_zero_previous_hash_differ() {
        let none = PendingBlock::genesis().finalize(0, 5, None);
        let zero = PendingBlock::genesis().finalize(0, 5, Some([0u8; 32]));
        assert_ne!(none.hash, zero.hash);
    }

    #[test]
    fn garbage_body_is_an_error_not_a_panic() {
        let mut block = PendingBlock::genesis().finalize(0, 1, None);
        block.body = "zz".to_string();
        assert!(matches!(block.decode_payload(), Err(PayloadError::Hex(_))));

        block.body = hex::encode("[1,2,3]");
        assert!(matches!(block.decode_payload(), Err(PayloadError::Json(_))));
        assert!(!block.validate_self());
    }

    #[test]
    fn hex_helpers() {
        let block = PendingBlock::genesis().finalize(0, 1, None);
        assert_eq!(block.hash_hex().len(), 64);
        assert!(block.previous_hash_hex().is_none());
    }

    #[test]
    fn block_serialization_roundtrip() {
        let block = PendingBlock::new(&star_payload("a"))
            .unwrap()
            .finalize(1, 2, Some([9u8; 32]));
        let json = serde_json::to_string(&block).expect("serialize");
        let recovered: Block = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(block, recovered);
    }
}
