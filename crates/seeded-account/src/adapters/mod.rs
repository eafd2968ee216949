//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits.

mod keystore;
mod memory_ledger;

pub use keystore::{read_keypair_file, write_keypair_file, FileKeyStore};
pub use memory_ledger::InMemoryLedger;
