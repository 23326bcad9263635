//! # Storage Module
//!
//! The chain itself: block structure, the append-only store, and the
//! auditor that walks it.
//!
//! ## Architecture
//!
//! ```text
//! block.rs       — Block / PendingBlock, payload encoding, digest preimage
//! chain.rs       — ChainStore: the single guarded append, lookups, views
//! validation.rs  — Fail-slow audit of hash linkage and self-consistency
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! BlockPayload → PendingBlock → ChainStore::append → Block
//!                                      ↓
//!                               validate_blocks → Vec<ValidationIssue>
//! ```
//!
//! Storage is in-memory only. The chain lives as long as the process does.

pub mod block;
pub mod chain;
pub mod validation;

pub use block::{Block, BlockPayload, PayloadError, PendingBlock, Star, StarRecord};
pub use chain::ChainStore;
pub use validation::{validate_blocks, ValidationIssue};
