//! # Ledger Context
//!
//! Everything a component needs to talk to the ledger, passed explicitly.

use std::future::Future;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::domain::{Identity, Keypair, LedgerError};
use crate::ports::LedgerClient;

/// Shared, read-only handles for one client.
pub struct LedgerContext<L: LedgerClient> {
    client: Arc<L>,
    payer: Arc<Keypair>,
    program_id: Identity,
    config: ClientConfig,
}

impl<L: LedgerClient> LedgerContext<L> {
    /// Create a context.
    pub fn new(
        client: Arc<L>,
        payer: Arc<Keypair>,
        program_id: Identity,
        config: ClientConfig,
    ) -> Self {
        Self {
            client,
            payer,
            program_id,
            config,
        }
    }

    /// Ledger handle.
    pub fn client(&self) -> &L {
        &self.client
    }

    /// Fee payer, also the base identity for derivation.
    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    /// Owning program.
    pub fn program_id(&self) -> &Identity {
        &self.program_id
    }

    /// Configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a ledger call under the configured confirmation bound.
    pub(crate) async fn bounded<T, F>(&self, call: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        tokio::time::timeout(self.config.confirm_timeout(), call)
            .await
            .unwrap_or(Err(LedgerError::Timeout))
    }
}

impl<L: LedgerClient> Clone for LedgerContext<L> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            payer: Arc::clone(&self.payer),
            program_id: self.program_id,
            config: self.config.clone(),
        }
    }
}
