//! # Provisioner
//!
//! Create-if-absent for seeded storage accounts.
//!
//! The existence check and the create are not atomic. When a create fails
//! the account is looked up once more: if a concurrent creator got there
//! first the outcome is `AlreadyExists`, otherwise `CreationFailed`.

use tracing::{info, warn};

use super::context::LedgerContext;
use crate::domain::{
    AccountInfo, Confirmation, CreateAccountWithSeedParams, Identity, ProvisionError,
    ProvisionOutcome, SeededAddress,
};
use crate::ports::LedgerClient;

/// Ensures a storage account exists at a seeded address.
pub struct Provisioner<'a, L: LedgerClient> {
    ctx: &'a LedgerContext<L>,
}

impl<'a, L: LedgerClient> Provisioner<'a, L> {
    /// Create a provisioner over a context.
    pub fn new(ctx: &'a LedgerContext<L>) -> Self {
        Self { ctx }
    }

    /// Create the account at `target` with `min_size` bytes unless it exists.
    pub async fn ensure_account(
        &self,
        target: &SeededAddress,
        min_size: usize,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        if let Some(existing) = self.lookup(&target.address).await? {
            self.inspect_existing(target, &existing, min_size);
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        info!(
            "[seeded-account] Creating account {} ({} bytes) to say hello to",
            target.address, min_size
        );
        match self.create(target, min_size).await {
            Ok(confirmation) => {
                info!(
                    "[seeded-account] Created account {} at slot {}",
                    target.address, confirmation.slot
                );
                Ok(ProvisionOutcome::Created)
            }
            Err(reason) => {
                warn!(
                    "[seeded-account] Create of {} failed ({}), re-checking",
                    target.address, reason
                );
                match self.lookup(&target.address).await? {
                    Some(_) => {
                        info!(
                            "[seeded-account] Account {} was created concurrently",
                            target.address
                        );
                        Ok(ProvisionOutcome::AlreadyExists)
                    }
                    None => Err(ProvisionError::CreationFailed(reason)),
                }
            }
        }
    }

    async fn lookup(&self, address: &Identity) -> Result<Option<AccountInfo>, ProvisionError> {
        self.ctx
            .bounded(self.ctx.client().get_account(address))
            .await
            .map_err(ProvisionError::LookupFailed)
    }

    async fn create(&self, target: &SeededAddress, min_size: usize) -> Result<Confirmation, String> {
        let payer = self.ctx.payer();
        if target.base != payer.identity() {
            return Err(format!(
                "base {} is not the payer {}; only the base may authorize creation",
                target.base,
                payer.identity()
            ));
        }

        let client = self.ctx.client();
        let lamports = self
            .ctx
            .bounded(client.minimum_balance_for_size(min_size))
            .await
            .map_err(|e| format!("minimum balance query failed: {}", e))?;

        let operation = client.create_account_with_seed(CreateAccountWithSeedParams {
            from: payer.identity(),
            base: target.base,
            seed: target.seed.clone(),
            new_account: target.address,
            lamports,
            space: min_size as u64,
            owner: target.owner,
        });

        let signers = [payer];
        self.ctx
            .bounded(client.submit_and_confirm(operation, &signers))
            .await
            .map_err(|e| e.to_string())
    }

    fn inspect_existing(&self, target: &SeededAddress, existing: &AccountInfo, min_size: usize) {
        if existing.owner != target.owner {
            warn!(
                "[seeded-account] Account {} is owned by {}, not {}",
                target.address, existing.owner, target.owner
            );
        }
        if existing.capacity() < min_size {
            warn!(
                "[seeded-account] Account {} holds {} bytes, {} requested",
                target.address,
                existing.capacity(),
                min_size
            );
        }
    }
}
