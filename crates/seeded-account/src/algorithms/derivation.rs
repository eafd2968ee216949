//! # Address Derivation
//!
//! Seeded addresses are `SHA-256(base || seed || owner)`. The ledger
//! re-derives the same hash when validating a create, so this must stay
//! bit-compatible with it.

use sha2::{Digest, Sha256};

use crate::domain::{DerivationError, Identity, SeededAddress, MAX_SEED_LEN, PDA_MARKER};

/// Derive the storage address for `(base, seed, owner)`.
pub fn derive(base: &Identity, seed: &str, owner: &Identity) -> Result<Identity, DerivationError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(DerivationError::SeedTooLong { len: seed.len() });
    }

    let owner_bytes = owner.as_bytes();
    if owner_bytes.ends_with(PDA_MARKER) {
        return Err(DerivationError::IllegalOwner(*owner));
    }

    let mut hasher = Sha256::new();
    hasher.update(base.as_bytes());
    hasher.update(seed.as_bytes());
    hasher.update(owner_bytes);
    Ok(Identity::new(hasher.finalize().into()))
}

/// Derive and keep the inputs alongside the address.
pub fn derive_seeded(
    base: &Identity,
    seed: &str,
    owner: &Identity,
) -> Result<SeededAddress, DerivationError> {
    let address = derive(base, seed, owner)?;
    Ok(SeededAddress {
        base: *base,
        seed: seed.to_owned(),
        owner: *owner,
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> Identity {
        Identity::new([n; 32])
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive(&id(1), "hello", &id(2)).unwrap();
        let b = derive(&id(1), "hello", &id(2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_layout() {
        let mut preimage = Vec::new();
        preimage.extend_from_slice(&[1u8; 32]);
        preimage.extend_from_slice(b"hello");
        preimage.extend_from_slice(&[2u8; 32]);
        let expected: [u8; 32] = Sha256::digest(&preimage).into();

        assert_eq!(
            derive(&id(1), "hello", &id(2)).unwrap(),
            Identity::new(expected)
        );
    }

    #[test]
    fn test_every_input_changes_the_address() {
        let reference = derive(&id(1), "hello", &id(2)).unwrap();
        assert_ne!(reference, derive(&id(3), "hello", &id(2)).unwrap());
        assert_ne!(reference, derive(&id(1), "hellp", &id(2)).unwrap());
        assert_ne!(reference, derive(&id(1), "hello", &id(4)).unwrap());
    }

    #[test]
    fn test_seed_of_32_bytes_accepted() {
        let seed = "a".repeat(32);
        assert!(derive(&id(1), &seed, &id(2)).is_ok());
    }

    #[test]
    fn test_seed_of_33_bytes_rejected() {
        let seed = "a".repeat(33);
        assert_eq!(
            derive(&id(1), &seed, &id(2)),
            Err(DerivationError::SeedTooLong { len: 33 })
        );
    }

    #[test]
    fn test_seed_length_counts_bytes() {
        // 11 three-byte characters: 11 chars, 33 bytes
        let seed = "€".repeat(11);
        assert_eq!(
            derive(&id(1), &seed, &id(2)),
            Err(DerivationError::SeedTooLong { len: 33 })
        );
    }

    #[test]
    fn test_empty_seed_accepted() {
        assert!(derive(&id(1), "", &id(2)).is_ok());
    }

    #[test]
    fn test_pda_marker_owner_rejected() {
        let mut bytes = [0u8; 32];
        bytes[32 - PDA_MARKER.len()..].copy_from_slice(PDA_MARKER);
        let owner = Identity::new(bytes);
        assert_eq!(
            derive(&id(1), "hello", &owner),
            Err(DerivationError::IllegalOwner(owner))
        );
    }

    #[test]
    fn test_derive_seeded_keeps_inputs() {
        let seeded = derive_seeded(&id(1), "hello", &id(2)).unwrap();
        assert_eq!(seeded.seed, "hello");
        assert_eq!(seeded.base, id(1));
        assert_eq!(seeded.owner, id(2));
        assert_eq!(seeded.address, derive(&id(1), "hello", &id(2)).unwrap());
    }
}
