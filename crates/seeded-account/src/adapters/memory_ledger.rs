//! In-Memory Ledger Adapter
//!
//! Implements the `LedgerClient` port against in-process state. It applies
//! the ledger-side rules the client relies on: seeded-address re-derivation,
//! signer checks, rent-exempt funding, owner-only writes and fixed capacity.
//!
//! Every deployed program behaves as a record store: an invoke copies its
//! payload over the front of the target account's data and zeroes the rest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::algorithms::derive;
use crate::config::LedgerConfig;
use crate::domain::{
    verify_signature, AccountInfo, AccountMeta, Confirmation, Identity, Keypair, LedgerError,
    Operation, Signature,
};
use crate::ports::outbound::LedgerClient;

/// In-process ledger.
pub struct InMemoryLedger {
    /// Economic and timing parameters.
    config: LedgerConfig,
    /// Accounts by address.
    accounts: RwLock<HashMap<Identity, AccountInfo>>,
    /// Last confirmed slot.
    slot: AtomicU64,
    /// Reachability flag.
    available: AtomicBool,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            accounts: RwLock::new(HashMap::new()),
            slot: AtomicU64::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Credit `lamports` to `to`, creating a plain account if needed.
    pub fn airdrop(&self, to: &Identity, lamports: u64) {
        let mut accounts = self.accounts.write();
        let account = accounts.entry(*to).or_insert_with(|| AccountInfo {
            owner: Identity::default(),
            lamports: 0,
            data: Vec::new(),
            executable: false,
        });
        account.lamports = account.lamports.saturating_add(lamports);
        debug!("[seeded-account] Airdropped {} lamports to {}", lamports, to);
    }

    /// Mark `program_id` as a deployed, executable program.
    pub fn deploy_program(&self, program_id: &Identity) {
        let lamports = self.rent_exempt_minimum(0);
        self.accounts.write().insert(
            *program_id,
            AccountInfo {
                owner: Identity::default(),
                lamports,
                data: Vec::new(),
                executable: true,
            },
        );
        info!("[seeded-account] Deployed program {}", program_id);
    }

    /// Insert or replace an account directly.
    pub fn insert_account(&self, address: Identity, account: AccountInfo) {
        self.accounts.write().insert(address, account);
    }

    /// Make the ledger unreachable or reachable again.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        if !available {
            warn!("[seeded-account] Ledger marked unavailable");
        }
    }

    /// Last confirmed slot.
    pub fn slot(&self) -> u64 {
        self.slot.load(Ordering::SeqCst)
    }

    /// Balance of `address`, zero if absent.
    pub fn balance(&self, address: &Identity) -> u64 {
        self.accounts
            .read()
            .get(address)
            .map(|a| a.lamports)
            .unwrap_or(0)
    }

    /// Minimum balance that exempts an account of `size` bytes from rent.
    /// Saturates at `u64::MAX` for sizes no account could have.
    pub fn rent_exempt_minimum(&self, size: usize) -> u64 {
        (size as u64)
            .saturating_add(self.config.account_storage_overhead)
            .saturating_mul(self.config.lamports_per_byte_year)
            .saturating_mul(self.config.exemption_threshold_years)
    }

    fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LedgerError::Unavailable("in-memory ledger offline".to_string()))
        }
    }

    fn check_signatures(
        operation: &Operation,
        message: &[u8],
        signatures: &[(Identity, Signature)],
    ) -> Result<(), LedgerError> {
        for (signer, signature) in signatures {
            if !verify_signature(signer, message, signature) {
                return Err(LedgerError::Rejected(format!(
                    "invalid signature from {}",
                    signer
                )));
            }
        }
        for required in operation.required_signers() {
            if !signatures.iter().any(|(signer, _)| *signer == required) {
                return Err(LedgerError::Rejected(format!(
                    "missing required signature for {}",
                    required
                )));
            }
        }
        Ok(())
    }

    fn apply(&self, operation: &Operation, fee_payer: &Identity) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.write();
        if !accounts.contains_key(fee_payer) {
            return Err(LedgerError::Rejected(format!(
                "fee payer {} has no account",
                fee_payer
            )));
        }

        match operation {
            Operation::CreateAccountWithSeed {
                from,
                new_account,
                base,
                seed,
                lamports,
                space,
                owner,
            } => {
                let expected = derive(base, seed, owner)
                    .map_err(|e| LedgerError::Rejected(format!("create: {}", e)))?;
                if expected != *new_account {
                    return Err(LedgerError::Rejected(format!(
                        "create: address {} does not match seed derivation",
                        new_account
                    )));
                }
                if *space > self.config.max_data_len {
                    return Err(LedgerError::Rejected(format!(
                        "create: {} bytes exceeds maximum data length {}",
                        space, self.config.max_data_len
                    )));
                }
                if let Some(existing) = accounts.get(new_account) {
                    if existing.lamports > 0 || !existing.data.is_empty() {
                        return Err(LedgerError::Rejected(format!(
                            "create: account {} already in use",
                            new_account
                        )));
                    }
                }
                let space = *space as usize;
                let minimum = self.rent_exempt_minimum(space);
                if *lamports < minimum {
                    return Err(LedgerError::Rejected(format!(
                        "create: {} lamports below rent-exempt minimum {}",
                        lamports, minimum
                    )));
                }
                let funder = accounts.get_mut(from).ok_or_else(|| {
                    LedgerError::Rejected(format!("create: funding account {} not found", from))
                })?;
                if funder.lamports < *lamports {
                    return Err(LedgerError::Rejected(format!(
                        "create: insufficient funds in {}: {} < {}",
                        from, funder.lamports, lamports
                    )));
                }
                funder.lamports -= lamports;
                accounts.insert(
                    *new_account,
                    AccountInfo {
                        owner: *owner,
                        lamports: *lamports,
                        data: vec![0u8; space],
                        executable: false,
                    },
                );
                Ok(())
            }
            Operation::Invoke {
                program_id,
                accounts: metas,
                data,
            } => {
                match accounts.get(program_id) {
                    Some(program) if program.executable => {}
                    _ => {
                        return Err(LedgerError::Rejected(format!(
                            "invoke: program {} is not deployed",
                            program_id
                        )))
                    }
                }
                let targets: Vec<&AccountMeta> = metas.iter().filter(|m| m.is_writable).collect();
                if targets.is_empty() {
                    return Err(LedgerError::Rejected(
                        "invoke: no writable account".to_string(),
                    ));
                }
                for meta in &targets {
                    let account = accounts.get(&meta.address).ok_or_else(|| {
                        LedgerError::Rejected(format!("invoke: account {} not found", meta.address))
                    })?;
                    if account.owner != *program_id {
                        return Err(LedgerError::Rejected(format!(
                            "invoke: account {} is not owned by program {}",
                            meta.address, program_id
                        )));
                    }
                    if data.len() > account.data.len() {
                        return Err(LedgerError::Rejected(format!(
                            "invoke: payload of {} bytes exceeds account capacity of {} bytes",
                            data.len(),
                            account.data.len()
                        )));
                    }
                }
                for meta in targets {
                    if let Some(account) = accounts.get_mut(&meta.address) {
                        let (head, tail) = account.data.split_at_mut(data.len());
                        head.copy_from_slice(data);
                        tail.fill(0);
                    }
                }
                Ok(())
            }
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn get_account(&self, address: &Identity) -> Result<Option<AccountInfo>, LedgerError> {
        self.ensure_available()?;
        debug!("[seeded-account] Looking up account {}", address);
        Ok(self.accounts.read().get(address).cloned())
    }

    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64, LedgerError> {
        self.ensure_available()?;
        if size as u64 > self.config.max_data_len {
            return Err(LedgerError::Rejected(format!(
                "{} bytes exceeds maximum data length {}",
                size, self.config.max_data_len
            )));
        }
        Ok(self.rent_exempt_minimum(size))
    }

    async fn submit_and_confirm(
        &self,
        operation: Operation,
        signers: &[&Keypair],
    ) -> Result<Confirmation, LedgerError> {
        self.ensure_available()?;
        let fee_payer = signers
            .first()
            .map(|k| k.identity())
            .ok_or_else(|| LedgerError::Rejected("no fee payer signature".to_string()))?;

        let message = operation
            .message()
            .map_err(|e| LedgerError::Rejected(format!("unencodable operation: {}", e)))?;
        let signatures: Vec<(Identity, Signature)> = signers
            .iter()
            .map(|k| (k.identity(), k.sign(&message)))
            .collect();
        Self::check_signatures(&operation, &message, &signatures)?;

        if self.config.confirmation_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.confirmation_latency_ms)).await;
        }

        self.apply(&operation, &fee_payer)?;
        let slot = self.slot.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("[seeded-account] Confirmed operation at slot {}", slot);

        Ok(Confirmation {
            signature: signatures[0].1,
            slot,
        })
    }
}
