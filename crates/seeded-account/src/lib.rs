//! # Seeded Account
//!
//! Client-side workflow for keeping a small, schema-described record in a
//! program-owned account on a replicated ledger.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Given a fee payer, a program and a seed string, the workflow:
//! - derives a deterministic storage address from `(payer, seed, program)`
//! - creates the storage account, funded to rent exemption, only if absent
//! - encodes a record with a compact little-endian schema codec
//! - submits it to the program and reads the stored bytes back
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Deterministic address | Same base, seed and owner always give the same address |
//! | Create-if-absent | Re-running never creates a second account |
//! | Exact decode | Field order is schema order; trailing bytes are padding |
//! | Bounded waits | Every ledger call is bounded by the confirmation timeout |
//!
//! ## Module Structure
//!
//! ```text
//! seeded-account/
//! ├── domain/          # Identity, keypairs, schemas, operations, errors
//! ├── algorithms/      # Schema codec, seeded address derivation
//! ├── ports/           # API trait (inbound) + ledger/key store traits (outbound)
//! ├── adapters/        # In-memory ledger, file key store
//! ├── application/     # Provisioner, submitter, RecordWorkflow
//! └── config.rs        # ClientConfig, LedgerConfig, CapacityPolicy
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{read_keypair_file, write_keypair_file, FileKeyStore, InMemoryLedger};
pub use algorithms::{decode, decode_exact, derive, derive_seeded, encode, min_size, size_of};
pub use application::{
    LedgerContext, OperationSubmitter, Provisioner, RecordWorkflow, WorkflowReport,
};
pub use config::{CapacityPolicy, ClientConfig, LedgerConfig, DEFAULT_SEED};
pub use domain::{
    AccountInfo, AccountMeta, CodecError, Confirmation, DerivationError, FieldDef, FieldType,
    GreetingAccount, Identity, KeyLoadError, Keypair, LedgerError, Operation, ProvisionError,
    ProvisionOutcome, Record, Schema, SchemaRecord, SeededAddress, Signature, SubmissionError,
    Value, WorkflowError, MAX_SEED_LEN,
};
pub use ports::{KeyStore, LedgerClient, SeededAccountApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
