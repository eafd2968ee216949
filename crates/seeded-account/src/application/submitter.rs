//! # Operation Submitter
//!
//! Builds one invoke operation carrying encoded record bytes and waits for
//! its confirmation. A failed submit says nothing about whether the account
//! changed; callers re-read before retrying.

use tracing::{debug, info};

use super::context::LedgerContext;
use crate::domain::{AccountMeta, Confirmation, Identity, Operation, SubmissionError};
use crate::ports::LedgerClient;

/// Submits state-changing operations against a storage account.
pub struct OperationSubmitter<'a, L: LedgerClient> {
    ctx: &'a LedgerContext<L>,
}

impl<'a, L: LedgerClient> OperationSubmitter<'a, L> {
    /// Create a submitter over a context.
    pub fn new(ctx: &'a LedgerContext<L>) -> Self {
        Self { ctx }
    }

    /// Hand `payload` to `owner` for storage at `address` and wait for
    /// confirmation.
    pub async fn submit(
        &self,
        address: &Identity,
        owner: &Identity,
        payload: Vec<u8>,
    ) -> Result<Confirmation, SubmissionError> {
        debug!(
            "[seeded-account] Submitting {} bytes to {} via program {}",
            payload.len(),
            address,
            owner
        );

        let operation = Operation::Invoke {
            program_id: *owner,
            accounts: vec![AccountMeta::writable(*address)],
            data: payload,
        };
        let signers = [self.ctx.payer()];
        let timeout_ms = self.ctx.config().confirm_timeout_ms;

        let confirmation = self
            .ctx
            .bounded(self.ctx.client().submit_and_confirm(operation, &signers))
            .await
            .map_err(|e| SubmissionError::from_ledger(e, timeout_ms))?;

        info!(
            "[seeded-account] Write to {} confirmed at slot {} ({})",
            address, confirmation.slot, confirmation.signature
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::algorithms::derive_seeded;
    use crate::application::Provisioner;
    use crate::config::{ClientConfig, LedgerConfig};
    use crate::domain::{Keypair, SeededAddress};

    async fn provisioned(
        ledger: Arc<InMemoryLedger>,
        config: ClientConfig,
        capacity: usize,
    ) -> (LedgerContext<InMemoryLedger>, SeededAddress) {
        let payer = Keypair::from_seed([1u8; 32]);
        let program = Keypair::from_seed([2u8; 32]).identity();
        ledger.airdrop(&payer.identity(), 1_000_000_000);
        ledger.deploy_program(&program);
        let ctx = LedgerContext::new(ledger, Arc::new(payer), program, config);
        let target = derive_seeded(&ctx.payer().identity(), "hello", &program).unwrap();
        Provisioner::new(&ctx)
            .ensure_account(&target, capacity)
            .await
            .unwrap();
        (ctx, target)
    }

    #[tokio::test]
    async fn test_submit_stores_payload() {
        let ledger = Arc::new(InMemoryLedger::default());
        let (ctx, target) = provisioned(ledger.clone(), ClientConfig::for_testing(), 8).await;

        let confirmation = OperationSubmitter::new(&ctx)
            .submit(&target.address, &target.owner, vec![1, 2, 3, 4, 5, 6, 7, 8])
            .await
            .unwrap();
        assert_eq!(confirmation.slot, 2);

        let account = ledger.get_account(&target.address).await.unwrap().unwrap();
        assert_eq!(account.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected() {
        let ledger = Arc::new(InMemoryLedger::default());
        let (ctx, target) = provisioned(ledger, ClientConfig::for_testing(), 8).await;

        let err = OperationSubmitter::new(&ctx)
            .submit(&target.address, &target.owner, vec![0u8; 35])
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected(reason) if reason.contains("capacity")));
    }

    #[tokio::test]
    async fn test_wrong_owner_rejected() {
        let ledger = Arc::new(InMemoryLedger::default());
        let (ctx, target) = provisioned(ledger.clone(), ClientConfig::for_testing(), 8).await;
        let impostor = Keypair::from_seed([6u8; 32]).identity();
        ledger.deploy_program(&impostor);

        let err = OperationSubmitter::new(&ctx)
            .submit(&target.address, &impostor, vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_slow_confirmation_times_out() {
        let ledger = Arc::new(InMemoryLedger::default());
        let (ctx, target) = provisioned(ledger, ClientConfig::for_testing(), 8).await;

        let slow = Arc::new(InMemoryLedger::new(
            LedgerConfig::for_testing().with_latency(2_000),
        ));
        let slow_ctx = LedgerContext::new(
            slow,
            Arc::new(Keypair::from_seed([1u8; 32])),
            *ctx.program_id(),
            ClientConfig {
                confirm_timeout_ms: 50,
                ..ClientConfig::for_testing()
            },
        );

        let err = OperationSubmitter::new(&slow_ctx)
            .submit(&target.address, &target.owner, vec![1])
            .await
            .unwrap_err();
        assert_eq!(err, SubmissionError::Timeout { timeout_ms: 50 });
    }

    #[tokio::test]
    async fn test_unavailable_ledger() {
        let ledger = Arc::new(InMemoryLedger::default());
        let (ctx, target) = provisioned(ledger.clone(), ClientConfig::for_testing(), 8).await;
        ledger.set_available(false);

        let err = OperationSubmitter::new(&ctx)
            .submit(&target.address, &target.owner, vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Unavailable(_)));
    }
}
