//! # Keypair
//!
//! Ed25519 signing credential. The verifying half is the [`Identity`].

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use super::value_objects::{Identity, Signature};

/// Secret bytes followed by public bytes.
pub const KEYPAIR_LEN: usize = 64;

/// Ed25519 keypair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create from 64 keypair bytes; `None` if the halves do not match.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LEN]) -> Option<Self> {
        SigningKey::from_keypair_bytes(bytes)
            .ok()
            .map(|signing_key| Self { signing_key })
    }

    /// The 64 keypair bytes.
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LEN] {
        self.signing_key.to_keypair_bytes()
    }

    /// Public identity.
    pub fn identity(&self) -> Identity {
        Identity::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

/// Check `signature` over `message` against `signer`.
///
/// Returns `false` for identities that are not valid curve points, which
/// includes every derived address.
pub fn verify_signature(signer: &Identity, message: &[u8], signature: &Signature) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(signer.as_bytes()) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    key.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::generate();
        let sig = keypair.sign(b"hello");
        assert!(verify_signature(&keypair.identity(), b"hello", &sig));
        assert!(!verify_signature(&keypair.identity(), b"hullo", &sig));
    }

    #[test]
    fn test_keypair_bytes_roundtrip() {
        let keypair = Keypair::from_seed([5u8; 32]);
        let restored = Keypair::from_keypair_bytes(&keypair.to_keypair_bytes()).unwrap();
        assert_eq!(restored.identity(), keypair.identity());
    }

    #[test]
    fn test_mismatched_halves_rejected() {
        let mut bytes = Keypair::from_seed([5u8; 32]).to_keypair_bytes();
        bytes[40] ^= 0xff;
        assert!(Keypair::from_keypair_bytes(&bytes).is_none());
    }

    #[test]
    fn test_seeded_keypair_is_deterministic() {
        assert_eq!(
            Keypair::from_seed([9u8; 32]).identity(),
            Keypair::from_seed([9u8; 32]).identity()
        );
    }
}
