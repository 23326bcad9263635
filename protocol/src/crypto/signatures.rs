//! # Ownership Signatures
//!
//! The registry never inspects key material itself. It asks a
//! [`SignatureVerifier`] one question, "did `address` sign `message`?", and
//! gets a yes or a no back.
//!
//! [`Ed25519Verifier`] is the stock answer: an address is the hex-encoded
//! 32-byte Ed25519 public key, and a signature is the hex-encoded 64-byte
//! Ed25519 signature over the UTF-8 bytes of the message. Anything that does
//! not parse simply fails verification; callers get no hint about which part
//! was wrong.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Capability that decides whether `signature` over `message` was produced by
/// the holder of `address`.
///
/// Implementations must be pure: no side effects, same answer for the same
/// inputs. Plain closures of the right shape implement this trait, which is
/// handy in tests.
pub trait SignatureVerifier: Send + Sync {
    /// Returns `true` only for a valid signature by `address` over `message`.
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        self(message, address, signature)
    }
}

/// Ed25519 verification over hex-encoded addresses and signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        let Some(key_bytes) = decode_fixed::<32>(address) else {
            return false;
        };
        let Some(sig_bytes) = decode_fixed::<64>(signature) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        verifying_key.verify(message.as_bytes(), &signature).is_ok()
    }
}

/// Sign `message` and return the hex signature [`Ed25519Verifier`] accepts.
pub fn sign_message(signing_key: &SigningKey, message: &str) -> String {
    hex::encode(signing_key.sign(message.as_bytes()).to_bytes())
}

/// The registry address of a signing key: its hex-encoded public key.
pub fn address_of(signing_key: &SigningKey) -> String {
    hex::encode(signing_key.verifying_key().to_bytes())
}

fn decode_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(s.trim()).ok()?;
    bytes.try_into().ok()
}
