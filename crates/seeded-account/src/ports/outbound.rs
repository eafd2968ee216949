//! # Outbound Ports
//!
//! Traits for the collaborators the client depends on: the ledger and the
//! key store.

use async_trait::async_trait;

use crate::domain::{
    AccountInfo, Confirmation, CreateAccountWithSeedParams, Identity, KeyLoadError, Keypair,
    LedgerError, Operation,
};

/// Ledger connection - outbound port.
///
/// Handles transport, signing envelopes and confirmation tracking. The
/// core only reads through it and submits single operations.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current state at `address`, `None` if no account exists.
    async fn get_account(&self, address: &Identity) -> Result<Option<AccountInfo>, LedgerError>;

    /// Minimum balance that keeps an account of `size` bytes alive.
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64, LedgerError>;

    /// Sign `operation` with `signers`, submit it and wait for confirmation.
    ///
    /// The first signer pays fees.
    async fn submit_and_confirm(
        &self,
        operation: Operation,
        signers: &[&Keypair],
    ) -> Result<Confirmation, LedgerError>;

    /// Build the create-with-seed operation.
    fn create_account_with_seed(&self, params: CreateAccountWithSeedParams) -> Operation {
        Operation::from(params)
    }
}

/// Key store - outbound port.
pub trait KeyStore: Send + Sync {
    /// Load the keypair stored under `name`.
    fn load(&self, name: &str) -> Result<Keypair, KeyLoadError>;
}
