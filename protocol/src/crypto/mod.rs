//! # Cryptographic Primitives for Starchain
//!
//! Two concerns, nothing more:
//!
//! - **SHA-256** for block digests and hash linkage.
//! - **Signature verification** behind the [`SignatureVerifier`] capability,
//!   with Ed25519 as the concrete scheme.
//!
//! Everything here is a thin wrapper around audited crates (`sha2`,
//! `ed25519-dalek`). Nothing is hand-rolled.

pub mod hash;
pub mod signatures;

pub use hash::{parse_digest_hex, sha256_array};
pub use signatures::{address_of, sign_message, Ed25519Verifier, SignatureVerifier};
