//! # Domain Value Objects
//!
//! Immutable value types shared by every component: identities, derived
//! addresses, ledger-side account state, operations and confirmations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum seed length in bytes accepted by the ledger.
pub const MAX_SEED_LEN: usize = 32;

/// Marker the ledger reserves for program-derived addresses.
pub const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// Identity length in bytes.
pub const IDENTITY_LEN: usize = 32;

/// Opaque 32-byte public identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Parse from 64 hex characters.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s.trim()).ok()?;
        let bytes: [u8; IDENTITY_LEN] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", hex::encode(&self.0[..4]))
    }
}

/// A derived address together with the inputs it was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededAddress {
    /// Identity whose credential authorizes creation.
    pub base: Identity,
    /// Human-readable seed.
    pub seed: String,
    /// Program that will own the account.
    pub owner: Identity,
    /// The derived address.
    pub address: Identity,
}

/// 64-byte ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}

/// Ledger-side state at an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Program permitted to write the data.
    pub owner: Identity,
    /// Balance held by the account.
    pub lamports: u64,
    /// Raw storage; its length is the capacity fixed at creation.
    pub data: Vec<u8>,
    /// Whether the account holds a deployed program.
    pub executable: bool,
}

impl AccountInfo {
    /// Storage capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Account reference carried by an invoke operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Account address.
    pub address: Identity,
    /// Must the account sign?
    pub is_signer: bool,
    /// May the program write to it?
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable, non-signing account.
    pub fn writable(address: Identity) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: true,
        }
    }

    /// Read-only, non-signing account.
    pub fn readonly(address: Identity) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: false,
        }
    }
}

/// Parameters for creating an account at a seeded address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountWithSeedParams {
    /// Funding account.
    pub from: Identity,
    /// Base identity used in derivation.
    pub base: Identity,
    /// Seed used in derivation.
    pub seed: String,
    /// Derived address of the new account.
    pub new_account: Identity,
    /// Balance to transfer in.
    pub lamports: u64,
    /// Storage capacity in bytes.
    pub space: u64,
    /// Program that will own the account.
    pub owner: Identity,
}

/// A single state-changing ledger operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Allocate and fund an account at a seeded address.
    CreateAccountWithSeed {
        /// Funding account.
        from: Identity,
        /// Derived address of the new account.
        new_account: Identity,
        /// Base identity used in derivation.
        base: Identity,
        /// Seed used in derivation.
        seed: String,
        /// Balance to transfer in.
        lamports: u64,
        /// Storage capacity in bytes.
        space: u64,
        /// Program that will own the account.
        owner: Identity,
    },
    /// Hand opaque payload bytes to a program.
    Invoke {
        /// Program to run.
        program_id: Identity,
        /// Accounts the program touches.
        accounts: Vec<AccountMeta>,
        /// Payload bytes.
        data: Vec<u8>,
    },
}

impl Operation {
    /// Canonical message bytes that signers sign.
    pub fn message(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Identities whose signatures the ledger requires.
    pub fn required_signers(&self) -> Vec<Identity> {
        match self {
            Operation::CreateAccountWithSeed { from, base, .. } => {
                if from == base {
                    vec![*from]
                } else {
                    vec![*from, *base]
                }
            }
            Operation::Invoke { accounts, .. } => accounts
                .iter()
                .filter(|meta| meta.is_signer)
                .map(|meta| meta.address)
                .collect(),
        }
    }
}

impl From<CreateAccountWithSeedParams> for Operation {
    fn from(params: CreateAccountWithSeedParams) -> Self {
        Operation::CreateAccountWithSeed {
            from: params.from,
            new_account: params.new_account,
            base: params.base,
            seed: params.seed,
            lamports: params.lamports,
            space: params.space,
            owner: params.owner,
        }
    }
}

/// Ledger acknowledgment that an operation is durably included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// Fee payer's signature over the operation message.
    pub signature: Signature,
    /// Slot the operation was included in.
    pub slot: u64,
}

/// Result of ensuring an account exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The account was already there; nothing was submitted.
    AlreadyExists,
    /// The account was created by this call.
    Created,
}
