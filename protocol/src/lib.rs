// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Starchain — Core Library
//!
//! An in-memory, append-only chain of tamper-evident blocks, and a registry
//! on top of it where a wallet proves control of its address by signing a
//! short-lived challenge before its star is written to the chain.
//!
//! ## Architecture
//!
//! - **config** — Constants baked into digests and challenges, plus runtime
//!   knobs.
//! - **clock** — Time source seam for block timestamps and challenge windows.
//! - **crypto** — SHA-256 digests and the signature verification capability.
//! - **storage** — Blocks, the chain store with its single guarded append,
//!   and the fail-slow chain auditor.
//! - **registry** — Challenge issuance, signed submissions, owner queries.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ed25519_dalek::SigningKey;
//! use rand::rngs::OsRng;
//! use starchain_protocol::crypto::{address_of, sign_message, Ed25519Verifier};
//! use starchain_protocol::registry::StarRegistry;
//! use starchain_protocol::storage::Star;
//!
//! let registry = StarRegistry::new(Arc::new(Ed25519Verifier));
//! let key = SigningKey::generate(&mut OsRng);
//! let address = address_of(&key);
//!
//! let challenge = registry.request_challenge(&address);
//! let signature = sign_message(&key, &challenge);
//! let block = registry
//!     .submit_star(&address, &challenge, &signature, Star::new("68° 52'", "16h 29m", "mine"))
//!     .unwrap();
//!
//! assert_eq!(block.height, 1);
//! assert_eq!(registry.stars_by_owner(&address).len(), 1);
//! assert!(registry.validate_chain().is_empty());
//! ```

pub mod clock;
pub mod config;
pub mod crypto;
pub mod registry;
pub mod storage;

pub use registry::{RegistryError, StarRegistry};
pub use storage::{Block, Star, StarRecord};
