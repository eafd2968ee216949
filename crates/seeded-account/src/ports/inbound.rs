//! # Inbound Ports
//!
//! API trait defining the individual workflow steps the client exposes.

use async_trait::async_trait;

use crate::domain::{Confirmation, ProvisionOutcome, SeededAddress, WorkflowError};

/// Seeded account API - inbound port.
#[async_trait]
pub trait SeededAccountApi: Send + Sync {
    /// Derive the storage address for the configured seed.
    fn derive_address(&self) -> Result<SeededAddress, WorkflowError>;

    /// Check the owning program is deployed.
    async fn check_program(&self) -> Result<(), WorkflowError>;

    /// Create the account if absent.
    async fn ensure_account(
        &self,
        target: &SeededAddress,
        min_size: usize,
    ) -> Result<ProvisionOutcome, WorkflowError>;

    /// Hand encoded bytes to the owning program for storage.
    async fn write_payload(
        &self,
        target: &SeededAddress,
        payload: Vec<u8>,
    ) -> Result<Confirmation, WorkflowError>;

    /// Read the account's raw storage.
    async fn read_payload(&self, target: &SeededAddress) -> Result<Vec<u8>, WorkflowError>;
}
