//! Ownership challenges.
//!
//! A challenge is self-describing: `<address>:<unix seconds>:starRegistry`.
//! Nothing is stored when one is issued, so asking for several challenges is
//! harmless. At submission time the timestamp embedded in the message is the
//! only anchor for the window check.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::error::RegistryError;
use crate::clock::Clock;
use crate::config::{CHALLENGE_SEPARATOR, CHALLENGE_SUFFIX};
use crate::crypto::signatures::SignatureVerifier;

/// Issues challenges and checks signed responses.
pub struct OwnershipVerifier {
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl std::fmt::Debug for OwnershipVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipVerifier")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl OwnershipVerifier {
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
        window: Duration,
    ) -> Self {
        Self {
            verifier,
            clock,
            window,
        }
    }

    /// The challenge `address` must sign.
    pub fn issue_challenge(&self, address: &str) -> String {
        format!(
            "{address}{sep}{now}{sep}{CHALLENGE_SUFFIX}",
            sep = CHALLENGE_SEPARATOR,
            now = self.clock.now_secs(),
        )
    }

    /// Check the window, then the signature.
    ///
    /// `elapsed == window` is still accepted. A challenge stamped in the
    /// future counts as zero seconds old.
    pub fn check(&self, address: &str, message: &str, signature: &str) -> Result<(), RegistryError> {
        let issued = challenge_timestamp(message)?;
        let elapsed = self.clock.now_secs().saturating_sub(issued);
        let window = self.window.as_secs();

        if elapsed > window {
            warn!(%address, elapsed, window, "rejected expired challenge");
            return Err(RegistryError::ExpiredChallenge { elapsed, window });
        }

        if !self.verifier.verify(message, address, signature) {
            warn!(%address, "rejected invalid signature");
            return Err(RegistryError::InvalidSignature);
        }

        Ok(())
    }

    /// Configured challenge window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Extract the issuance time: the second colon-delimited field.
pub fn challenge_timestamp(message: &str) -> Result<u64, RegistryError> {
    let field = message
        .split(CHALLENGE_SEPARATOR)
        .nth(1)
        .ok_or_else(|| RegistryError::MalformedChallenge("missing timestamp field".into()))?;
    field
        .trim()
        .parse::<u64>()
        .map_err(|_| RegistryError::MalformedChallenge(format!("invalid timestamp `{}`", field)))
}
