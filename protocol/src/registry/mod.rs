//! # Star Registry
//!
//! The public face of the crate. [`StarRegistry`] ties the chain store to
//! the ownership verifier:
//!
//! ```text
//! request_challenge(address) ──► "<address>:<now>:starRegistry"
//!                                        │ signed by the wallet
//!                                        ▼
//! submit_star(address, message, signature, star)
//!     ├─ window check      ──► ExpiredChallenge
//!     ├─ signature check   ──► InvalidSignature
//!     └─ ChainStore::append ──► Block
//! ```
//!
//! Queries (`get_block_by_*`, `stars_by_owner`, `validate_chain`) are
//! read-only and never fail; absence is `None` or an empty `Vec`.
//!
//! Every operation is synchronous. The only shared mutable state is the
//! chain store, and it serializes its own appends.

pub mod error;
pub mod ownership;

use std::sync::Arc;

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::crypto::signatures::SignatureVerifier;
use crate::storage::{Block, BlockPayload, ChainStore, PendingBlock, Star, StarRecord, ValidationIssue};

pub use error::RegistryError;
pub use ownership::{challenge_timestamp, OwnershipVerifier};

/// Hash-linked star registry with signature-gated writes.
#[derive(Debug)]
pub struct StarRegistry {
    store: ChainStore,
    ownership: OwnershipVerifier,
}

impl StarRegistry {
    /// Registry on the system clock with the default window, genesis created.
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        let registry =
            Self::with_config(RegistryConfig::default(), verifier, Arc::new(SystemClock));
        registry.initialize();
        registry
    }

    /// Registry with explicit config and clock. Starts empty; call
    /// [`initialize`](Self::initialize) to create genesis.
    pub fn with_config(
        config: RegistryConfig,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: ChainStore::new(Arc::clone(&clock)),
            ownership: OwnershipVerifier::new(verifier, clock, config.challenge_window),
        }
    }

    /// Create the genesis block if missing. Idempotent.
    pub fn initialize(&self) -> bool {
        self.store.initialize()
    }

    /// Height of the tip, `-1` before genesis.
    pub fn chain_height(&self) -> i64 {
        self.store
            .current_height()
            .map_or(-1, |h| i64::try_from(h).unwrap_or(i64::MAX))
    }

    /// Challenge message for `address` to sign.
    pub fn request_challenge(&self, address: &str) -> String {
        self.ownership.issue_challenge(address)
    }

    /// Verify a signed challenge and register `star` to `address`.
    ///
    /// All-or-nothing: on error the chain is unchanged.
    pub fn submit_star(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: Star,
    ) -> Result<Block, RegistryError> {
        self.ownership.check(address, message, signature)?;

        let payload = BlockPayload::Star(StarRecord {
            star,
            owner: address.to_string(),
        });
        let pending = PendingBlock::new(&payload)?;
        let block = self.store.append(pending);

        info!(%address, height = block.height, hash = %block.hash_hex(), "star registered");
        Ok(block)
    }

    /// Block with hex digest `hash`.
    pub fn get_block_by_hash(&self, hash: &str) -> Option<Block> {
        self.store.get_by_hash(hash)
    }

    /// Block at `height`.
    pub fn get_block_by_height(&self, height: u64) -> Option<Block> {
        self.store.get_by_height(height)
    }

    /// Every star registered to `address`, in chain order.
    ///
    /// Scans the whole chain before returning. Genesis is skipped. A body
    /// that no longer decodes (only possible after tampering) is logged and
    /// skipped.
    pub fn stars_by_owner(&self, address: &str) -> Vec<StarRecord> {
        let blocks = self.store.blocks();
        let mut stars = Vec::new();
        for block in blocks.iter() {
            match block.decode_payload() {
                Ok(payload) => {
                    if let Some(record) = payload.into_star() {
                        if record.owner == address {
                            stars.push(record);
                        }
                    }
                }
                Err(e) => warn!(height = block.height, error = %e, "skipping undecodable block body"),
            }
        }
        stars
    }

    /// Full audit of the chain.
    pub fn validate_chain(&self) -> Vec<ValidationIssue> {
        self.store.validate()
    }

    /// The underlying chain store.
    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    /// Configured challenge window in seconds.
    pub fn challenge_window_secs(&self) -> u64 {
        self.ownership.window().as_secs()
    }
}
