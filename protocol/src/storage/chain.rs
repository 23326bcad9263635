//! In-memory chain store.
//!
//! The store owns every block behind a single `parking_lot::RwLock`. All
//! mutation goes through [`ChainStore::append`], which holds the write lock
//! for the whole read-height → assign → digest → push sequence, so two
//! concurrent appends are serialized and the second always links to the
//! first. Readers take the read lock and only ever see fully finalized
//! blocks.

use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use tracing::{debug, info};

use super::block::{Block, PendingBlock};
use super::validation::{validate_blocks, ValidationIssue};
use crate::clock::Clock;
use crate::crypto::hash::parse_digest_hex;

/// Append-only, hash-linked block sequence.
pub struct ChainStore {
    blocks: RwLock<Vec<Block>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ChainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ChainStore {
    /// An empty store. Call [`initialize`](Self::initialize) to create genesis.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            blocks: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Height of the latest block, or `None` before genesis exists.
    pub fn current_height(&self) -> Option<u64> {
        let blocks = self.blocks.read();
        blocks.last().map(|b| b.height)
    }

    /// Creates the genesis block if the store is empty.
    ///
    /// Returns `true` when genesis was created, `false` when the chain
    /// already had blocks. Safe to call any number of times.
    pub fn initialize(&self) -> bool {
        let mut blocks = self.blocks.write();
        if !blocks.is_empty() {
            return false;
        }
        let genesis = self.append_locked(&mut blocks, PendingBlock::genesis());
        info!(hash = %genesis.hash_hex(), "genesis block created");
        true
    }

    /// Finalize `pending` as the new tip and return it.
    ///
    /// Assigns height (0 on an empty store), timestamp, and previous hash,
    /// computes the digest, and pushes the block. The write lock is held for
    /// all of it.
    pub fn append(&self, pending: PendingBlock) -> Block {
        let mut blocks = self.blocks.write();
        self.append_locked(&mut blocks, pending)
    }

    fn append_locked(&self, blocks: &mut Vec<Block>, pending: PendingBlock) -> Block {
        let (height, previous_hash) = match blocks.last() {
            Some(tip) => (tip.height + 1, Some(tip.hash)),
            None => (0, None),
        };
        let block = pending.finalize(height, self.clock.now_secs(), previous_hash);
        blocks.push(block.clone());
        debug!(height, hash = %block.hash_hex(), "block appended");
        block
    }

    /// Block whose hex digest is `hash`. Malformed hex finds nothing.
    pub fn get_by_hash(&self, hash: &str) -> Option<Block> {
        let digest = parse_digest_hex(hash)?;
        let blocks = self.blocks.read();
        blocks.iter().find(|b| b.hash == digest).cloned()
    }

    /// Block at `height`. Heights are dense, so this is a direct index.
    pub fn get_by_height(&self, height: u64) -> Option<Block> {
        let index = usize::try_from(height).ok()?;
        let blocks = self.blocks.read();
        blocks.get(index).cloned()
    }

    /// The latest block, if any.
    pub fn tip(&self) -> Option<Block> {
        self.blocks.read().last().cloned()
    }

    /// Read-only, order-preserving view of every block.
    ///
    /// Holds the read lock until dropped; appends wait for it. Keep the view
    /// short-lived.
    pub fn blocks(&self) -> MappedRwLockReadGuard<'_, [Block]> {
        RwLockReadGuard::map(self.blocks.read(), |v| v.as_slice())
    }

    /// Audit the whole chain. Empty result means fully consistent.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_blocks(&self.blocks())
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Whether genesis has not been created yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Mutate a stored block in place, bypassing every invariant. Test-only.
    #[cfg(test)]
    pub(crate) fn tamper(&self, height: u64, f: impl FnOnce(&mut Block)) {
        let mut blocks = self.blocks.write();
        f(&mut blocks[height as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::block::{BlockPayload, Star, StarRecord};

    fn store() -> (ChainStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        (ChainStore::new(clock.clone()), clock)
    }

    fn pending(owner: &str) -> PendingBlock {
        PendingBlock::new(&BlockPayload::Star(StarRecord {
            star: Star::new("1", "2", "story"),
            owner: owner.to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn empty_store_has_no_height() {
        let (store, _) = store();
        assert_eq!(store.current_height(), None);
        assert!(store.is_empty());
        assert!(store.tip().is_none());
    }

    #[test]
    fn initialize_creates_genesis_once() {
        let (store, _) = store();
        assert!(store.initialize());
        assert!(!store.initialize());
        assert_eq!(store.len(), 1);

        let genesis = store.get_by_height(0).unwrap();
        assert_eq!(genesis.height, 0);
        assert!(genesis.previous_hash.is_none());
        assert_eq!(genesis.decode_payload().unwrap(), BlockPayload::genesis());
    }

    #[test]
    fn append_on_empty_store_is_height_zero() {
        let (store, _) = store();
        let block = store.append(pending("a"));
        assert_eq!(block.height, 0);
        assert!(block.previous_hash.is_none());
        assert_eq!(store.current_height(), Some(0));
    }

    #[test]
    fn append_links_to_tip() {
        let (store, clock) = store();
        store.initialize();
        clock.advance(3);
        let b1 = store.append(pending("a"));
        let b2 = store.append(pending("b"));

        let genesis = store.get_by_height(0).unwrap();
        assert_eq!(b1.height, 1);
        assert_eq!(b1.previous_hash, Some(genesis.hash));
        assert_eq!(b1.timestamp, 1_700_000_003);
        assert_eq!(b2.previous_hash, Some(b1.hash));
        assert_eq!(store.current_height(), Some(2));
        assert_eq!(store.tip().unwrap(), b2);
    }

    #[test]
    fn timestamps_may_go_backwards() {
        let (store, clock) = store();
        store.initialize();
        clock.set(10);
        let late = store.append(pending("a"));
        assert_eq!(late.timestamp, 10);
        assert!(store.validate().is_empty());
    }

    #[test]
    fn lookups_return_none_when_absent() {
        let (store, _) = store();
        assert!(store.get_by_height(0).is_none());
        assert!(store.get_by_hash(&"00".repeat(32)).is_none());

        store.initialize();
        assert!(store.get_by_height(1).is_none());
        assert!(store.get_by_height(u64::MAX).is_none());
        assert!(store.get_by_hash(&"ab".repeat(32)).is_none());
        assert!(store.get_by_hash("not-a-hash").is_none());
    }

    #[test]
    fn lookup_by_hash_and_height_agree() {
        let (store, _) = store();
        store.initialize();
        let b = store.append(pending("a"));
        assert_eq!(store.get_by_hash(&b.hash_hex()), Some(b.clone()));
        assert_eq!(store.get_by_height(1), Some(b));
    }

    #[test]
    fn view_preserves_order() {
        let (store, _) = store();
        store.initialize();
        for owner in ["a", "b", "c"] {
            store.append(pending(owner));
        }
        let view = store.blocks();
        for (i, block) in view.iter().enumerate() {
            assert_eq!(block.height, i as u64);
        }
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn concurrent_appends_stay_dense_and_linked() {
        let (store, _) = store();
        let store = Arc::new(store);
        store.initialize();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.append(pending(&format!("owner-{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.current_height(), Some(200));
        assert!(store.validate().is_empty());
    }
}
