//! # Record Workflow
//!
//! Application service composing the components in a fixed order:
//!
//! ```text
//! check program → derive → encode → ensure account → submit → read → decode → compare
//! ```
//!
//! The record is encoded before the account is ensured so the capacity
//! policy can size a new account from the encoded length. Encoding touches
//! no ledger state, so a record that fails to encode never creates an
//! account.
//!
//! Each step depends on the previous one; nothing runs in parallel. Errors
//! are tagged with the step and address and otherwise passed through.

use async_trait::async_trait;
use tracing::{debug, info};

use super::context::LedgerContext;
use super::provisioner::Provisioner;
use super::submitter::OperationSubmitter;
use crate::algorithms::{codec, derive_seeded};
use crate::domain::{Confirmation, ProvisionOutcome, SchemaRecord, SeededAddress, WorkflowError};
use crate::ports::{LedgerClient, SeededAccountApi};

/// Outcome of a full workflow run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowReport<T> {
    /// Address the record lives at.
    pub address: SeededAddress,
    /// Whether the account was created by this run.
    pub provision: ProvisionOutcome,
    /// Bytes that were submitted.
    pub encoded: Vec<u8>,
    /// Confirmation of the write.
    pub confirmation: Confirmation,
    /// Record decoded from the account after the write.
    pub record: T,
}

/// Record workflow service.
pub struct RecordWorkflow<L: LedgerClient> {
    ctx: LedgerContext<L>,
}

impl<L: LedgerClient> RecordWorkflow<L> {
    /// Create a workflow over a context.
    pub fn new(ctx: LedgerContext<L>) -> Self {
        Self { ctx }
    }

    /// The context this workflow runs with.
    pub fn context(&self) -> &LedgerContext<L> {
        &self.ctx
    }

    /// Run the whole sequence for `record`.
    pub async fn run<T>(&self, record: &T) -> Result<WorkflowReport<T>, WorkflowError>
    where
        T: SchemaRecord + PartialEq + std::fmt::Debug,
    {
        info!("[seeded-account] Using program {}", self.ctx.program_id());
        self.check_program().await?;

        let target = self.derive_address()?;
        info!(
            "[seeded-account] Derived address {} from seed {:?}",
            target.address, target.seed
        );

        let encoded = codec::encode_typed(record).map_err(WorkflowError::Encode)?;
        let capacity = self
            .ctx
            .config()
            .capacity
            .resolve(codec::min_size(&T::SCHEMA), encoded.len());

        let provision = self.ensure_account(&target, capacity).await?;

        info!(
            "[seeded-account] Data to send ({} bytes): {}",
            encoded.len(),
            hex::encode(&encoded)
        );
        let confirmation = self.write_payload(&target, encoded.clone()).await?;

        let stored = self.read_payload(&target).await?;
        debug!("[seeded-account] Account data: {}", hex::encode(&stored));
        let decoded: T = codec::decode_typed(&stored).map_err(|source| WorkflowError::Decode {
            address: target.address,
            source,
        })?;

        if self.ctx.config().verify_read_back && decoded != *record {
            return Err(WorkflowError::ReadBackMismatch {
                address: target.address,
            });
        }
        info!("[seeded-account] {} holds {:?}", target.address, decoded);

        Ok(WorkflowReport {
            address: target,
            provision,
            encoded,
            confirmation,
            record: decoded,
        })
    }
}

#[async_trait]
impl<L: LedgerClient> SeededAccountApi for RecordWorkflow<L> {
    fn derive_address(&self) -> Result<SeededAddress, WorkflowError> {
        let base = self.ctx.payer().identity();
        Ok(derive_seeded(
            &base,
            &self.ctx.config().seed,
            self.ctx.program_id(),
        )?)
    }

    async fn check_program(&self) -> Result<(), WorkflowError> {
        let program = *self.ctx.program_id();
        let account = self
            .ctx
            .bounded(self.ctx.client().get_account(&program))
            .await
            .map_err(|source| WorkflowError::ProgramLookup { program, source })?;
        match account {
            Some(info) if info.executable => Ok(()),
            _ => Err(WorkflowError::ProgramNotDeployed { program }),
        }
    }

    async fn ensure_account(
        &self,
        target: &SeededAddress,
        min_size: usize,
    ) -> Result<ProvisionOutcome, WorkflowError> {
        Provisioner::new(&self.ctx)
            .ensure_account(target, min_size)
            .await
            .map_err(|source| WorkflowError::Provision {
                address: target.address,
                source,
            })
    }

    async fn write_payload(
        &self,
        target: &SeededAddress,
        payload: Vec<u8>,
    ) -> Result<Confirmation, WorkflowError> {
        OperationSubmitter::new(&self.ctx)
            .submit(&target.address, &target.owner, payload)
            .await
            .map_err(|source| WorkflowError::Submission {
                address: target.address,
                source,
            })
    }

    async fn read_payload(&self, target: &SeededAddress) -> Result<Vec<u8>, WorkflowError> {
        let address = target.address;
        let account = self
            .ctx
            .bounded(self.ctx.client().get_account(&address))
            .await
            .map_err(|source| WorkflowError::ReadBack { address, source })?;
        account
            .map(|info| info.data)
            .ok_or(WorkflowError::AccountMissing { address })
    }
}
