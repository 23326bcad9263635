//! Error types for the star registry.
//!
//! Every way [`submit_star`](super::StarRegistry::submit_star) can fail. A
//! failed submission leaves the chain untouched; the caller requests a fresh
//! challenge and tries again.

use thiserror::Error;

use crate::storage::PayloadError;

/// Errors returned when submitting a star.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The signed challenge is older than the configured window.
    #[error("challenge expired: issued {elapsed}s ago (window: {window}s)")]
    ExpiredChallenge {
        /// Seconds between challenge issuance and submission.
        elapsed: u64,
        /// Configured window in seconds.
        window: u64,
    },

    /// The signature does not verify against the message and address.
    #[error("signature verification failed")]
    InvalidSignature,

    /// The message is not of the form `<address>:<unix seconds>:starRegistry`.
    #[error("malformed challenge message: {0}")]
    MalformedChallenge(String),

    /// The star could not be encoded into a block body.
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
