//! # Registry Configuration & Constants
//!
//! Every magic string and number in Starchain lives here. Several of them are
//! baked into block digests and challenge messages, so changing them after
//! blocks have been produced invalidates everything already on the chain.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Crate-level protocol version reported by the node.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Ownership Challenges
// ---------------------------------------------------------------------------

/// Trailing tag of every ownership challenge:
/// `<address>:<unix seconds>:starRegistry`.
pub const CHALLENGE_SUFFIX: &str = "starRegistry";

/// Field separator inside a challenge message.
pub const CHALLENGE_SEPARATOR: char = ':';

/// How long a signed challenge stays acceptable, in seconds.
///
/// Five minutes. A challenge whose age equals the window exactly is still
/// accepted; one second more and it is expired.
pub const CHALLENGE_WINDOW_SECS: u64 = 300;

/// [`CHALLENGE_WINDOW_SECS`] as a `Duration`.
pub const CHALLENGE_WINDOW: Duration = Duration::from_secs(CHALLENGE_WINDOW_SECS);

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Marker text stored in the genesis block payload as `{"data": ...}`.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// Domain tag prefixed to every block digest preimage. Versioned so a future
/// layout change can never collide with digests produced under this one.
pub const BLOCK_DIGEST_DOMAIN: &[u8] = b"starchain/block/v1";

/// Block digest length in bytes (SHA-256).
pub const DIGEST_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Tunable parameters for a [`StarRegistry`](crate::registry::StarRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum age of a challenge at submission time.
    pub challenge_window: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            challenge_window: CHALLENGE_WINDOW,
        }
    }
}

impl RegistryConfig {
    /// Config with a custom challenge window in whole seconds.
    pub fn with_window_secs(secs: u64) -> Self {
        Self {
            challenge_window: Duration::from_secs(secs),
        }
    }
}
