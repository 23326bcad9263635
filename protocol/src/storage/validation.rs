//! Full-chain audit.
//!
//! [`validate_blocks`] walks a block sequence and records every discrepancy
//! it finds. It never stops at the first problem: the result is an audit
//! report, not a pass/fail gate. An empty report means the sequence is
//! consistent.
//!
//! Per block, independently:
//!
//! 1. **Self-check**: the stored hash matches the recomputed one.
//! 2. **Position**: `height` equals the block's index.
//! 3. **Genesis**: the block at index 0 has no previous hash.
//! 4. **Linkage** (index > 0): `previous_hash` equals the stored hash of the
//!    preceding block. When it does, but the preceding block fails its own
//!    self-check, the link still names a digest that no longer describes its
//!    predecessor's content, and that is reported as a stale link.

use thiserror::Error;

use super::block::Block;

/// One integrity problem found while auditing the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("block {height}: stored hash {stored} does not match computed hash {computed}")]
    DigestMismatch {
        height: u64,
        stored: String,
        computed: String,
    },

    #[error("block at index {index} reports height {height}")]
    HeightMismatch { index: u64, height: u64 },

    #[error("genesis block must not have a previous hash (found {found})")]
    GenesisHasParent { found: String },

    #[error("block {height}: previous hash {found} does not match predecessor hash {expected}")]
    BrokenLink {
        height: u64,
        expected: String,
        found: String,
    },

    #[error("block {height}: previous hash {linked} points at a predecessor whose content no longer hashes to it")]
    StaleLink { height: u64, linked: String },
}

impl ValidationIssue {
    /// Chain position the issue was found at.
    pub fn height(&self) -> u64 {
        match self {
            ValidationIssue::DigestMismatch { height, .. }
            | ValidationIssue::BrokenLink { height, .. }
            | ValidationIssue::StaleLink { height, .. } => *height,
            ValidationIssue::HeightMismatch { index, .. } => *index,
            ValidationIssue::GenesisHasParent { .. } => 0,
        }
    }

    /// Whether this is a linkage problem (broken or stale).
    pub fn is_link_issue(&self) -> bool {
        matches!(
            self,
            ValidationIssue::BrokenLink { .. } | ValidationIssue::StaleLink { .. }
        )
    }
}

/// Audit `blocks` and return every issue found, in chain order.
pub fn validate_blocks(blocks: &[Block]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    // Self-check results are reused by the successor's link check.
    let mut prev_intact = true;

    for (index, block) in blocks.iter().enumerate() {
        let index = index as u64;
        let computed = block.compute_hash();
        let intact = computed == block.hash;

        if !intact {
            issues.push(ValidationIssue::DigestMismatch {
                height: index,
                stored: hex::encode(block.hash),
                computed: hex::encode(computed),
            });
        }

        if block.height != index {
            issues.push(ValidationIssue::HeightMismatch {
                index,
                height: block.height,
            });
        }

        if index == 0 {
            if let Some(prev) = block.previous_hash {
                issues.push(ValidationIssue::GenesisHasParent {
                    found: hex::encode(prev),
                });
            }
        } else {
            let predecessor = &blocks[index as usize - 1];
            match block.previous_hash {
                Some(prev) if prev == predecessor.hash => {
                    if !prev_intact {
                        issues.push(ValidationIssue::StaleLink {
                            height: index,
                            linked: hex::encode(prev),
                        });
                    }
                }
                other => issues.push(ValidationIssue::BrokenLink {
                    height: index,
                    expected: hex::encode(predecessor.hash),
                    found: other.map(hex::encode).unwrap_or_else(|| "none".to_string()),
                }),
            }
        }

        prev_intact = intact;
    }

    issues
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::block::{BlockPayload, PendingBlock, Star, StarRecord};
    use crate::storage::chain::ChainStore;

    fn star(owner: &str, story: &str) -> PendingBlock {
        PendingBlock::new(&BlockPayload::Star(StarRecord {
            star: Star::new("1", "2", story),
            owner: owner.to_string(),
        }))
        .unwrap()
    }

    fn chain_of(n: usize) -> ChainStore {
        let store = ChainStore::new(Arc::new(ManualClock::new(1_000)));
        store.initialize();
        for i in 0..n {
            store.append(star("owner", &format!("story {}", i)));
        }
        store
    }

    #[test]
    fn untouched_chain_is_clean() {
        assert!(chain_of(5).validate().is_empty());
    }

    #[test]
    fn empty_sequence_is_clean() {
        assert!(validate_blocks(&[]).is_empty());
    }

    #[test]
    fn payload_tamper_reports_self_check_and_stale_link() {
        let store = chain_of(4);
        store.tamper(2, |b| b.body = star("thief", "stolen").body().to_string());

        let issues = store.validate();
        assert_eq!(issues.len(), 2, "{:?}", issues);
        assert!(matches!(issues[0], ValidationIssue::DigestMismatch { height: 2, .. }));
        assert!(matches!(issues[1], ValidationIssue::StaleLink { height: 3, .. }));
    }

    #[test]
    fn rehashed_tamper_breaks_the_next_link() {
        let store = chain_of(4);
        store.tamper(2, |b| {
            b.body = star("thief", "stolen").body().to_string();
            b.hash = b.compute_hash();
        });

        let issues = store.validate();
        assert_eq!(issues.len(), 1, "{:?}", issues);
        assert!(matches!(issues[0], ValidationIssue::BrokenLink { height: 3, .. }));
        assert!(issues[0].is_link_issue());
    }

    #[test]
    fn tampered_tip_has_no_successor_to_flag() {
        let store = chain_of(2);
        store.tamper(2, |b| b.timestamp += 1);
        let issues = store.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].height(), 2);
    }

    #[test]
    fn tampered_genesis_is_reported() {
        let store = chain_of(1);
        store.tamper(0, |b| b.body = hex::encode("{\"data\":\"Forged\"}"));
        let issues = store.validate();
        assert!(matches!(issues[0], ValidationIssue::DigestMismatch { height: 0, .. }));
        assert!(matches!(issues[1], ValidationIssue::StaleLink { height: 1, .. }));
    }

    #[test]
    fn genesis_with_parent_is_reported() {
        let store = chain_of(0);
        store.tamper(0, |b| {
            b.previous_hash = Some([5u8; 32]);
            b.hash = b.compute_hash();
        });
        let issues = store.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ValidationIssue::GenesisHasParent { .. }));
    }

    #[test]
    fn genesis_rules_follow_position_not_stored_height() {
        let store = chain_of(1);
        store.tamper(0, |b| {
            b.height = 7;
            b.previous_hash = Some([1u8; 32]);
            b.hash = b.compute_hash();
        });

        let issues = store.validate();
        assert_eq!(issues.len(), 3, "{:?}", issues);
        assert!(matches!(issues[0], ValidationIssue::HeightMismatch { index: 0, height: 7 }));
        assert!(matches!(issues[1], ValidationIssue::GenesisHasParent { .. }));
        assert!(matches!(issues[2], ValidationIssue::BrokenLink { height: 1, .. }));
    }

    #[test]
    fn fail_slow_collects_every_problem() {
        let store = chain_of(5);
        store.tamper(1, |b| b.body.clear());
        store.tamper(3, |b| b.previous_hash = None);
        store.tamper(5, |b| {
            b.height = 9;
            b.hash = b.compute_hash();
        });

        let issues = store.validate();
        let heights: Vec<u64> = issues.iter().map(ValidationIssue::height).collect();
        // 1: digest, 2: stale link, 3: digest + broken link, 4: stale link, 5: height
        assert_eq!(heights, vec![1, 2, 3, 3, 4, 5]);
    }

    #[test]
    fn messages_name_the_block() {
        let issue = ValidationIssue::BrokenLink {
            height: 4,
            expected: "aa".into(),
            found: "bb".into(),
        };
        let text = issue.to_string();
        assert!(text.contains("block 4"));
        assert!(text.contains("predecessor hash aa"));
    }
}
