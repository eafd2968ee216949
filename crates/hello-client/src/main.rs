//! # Hello Client
//!
//! Runs the seeded-account workflow once: derive the payer's storage
//! address for the configured seed, create the account if absent, write
//! the greeting record and print what was read back.
//!
//! The ledger is the in-memory adapter; the payer is funded and the
//! program deployed at startup.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use seeded_account::{
    FileKeyStore, InMemoryLedger, KeyStore, Keypair, LedgerContext, ProvisionOutcome,
    RecordWorkflow,
};

use crate::config::RuntimeConfig;

fn load_keypair(store: &dyn KeyStore, name: Option<&str>, role: &str) -> Result<Keypair> {
    match name {
        Some(name) => store
            .load(name)
            .with_context(|| format!("failed to load {} keypair", role)),
        None => {
            warn!("No {} keypair configured, using an ephemeral one", role);
            Ok(Keypair::generate())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = RuntimeConfig::from_env();
    let store = FileKeyStore::new(&config.keypair_dir);
    let payer = load_keypair(&store, config.payer_keypair.as_deref(), "payer")?;
    let program = load_keypair(&store, config.program_keypair.as_deref(), "program")?.identity();

    // Stand up the ledger
    let ledger = Arc::new(InMemoryLedger::default());
    ledger.airdrop(&payer.identity(), config.airdrop_lamports);
    ledger.deploy_program(&program);
    info!(
        "Payer {} funded with {} lamports",
        payer.identity(),
        ledger.balance(&payer.identity())
    );

    let ctx = LedgerContext::new(ledger.clone(), Arc::new(payer), program, config.client);
    let workflow = RecordWorkflow::new(ctx);

    let report = workflow
        .run(&config.greeting)
        .await
        .context("hello workflow failed")?;

    match report.provision {
        ProvisionOutcome::Created => info!("Created account {}", report.address.address),
        ProvisionOutcome::AlreadyExists => {
            info!("Reused account {}", report.address.address)
        }
    }
    info!("Wrote {} bytes: {}", report.encoded.len(), hex::encode(&report.encoded));
    info!(
        "{} has message {:?} and counter {} (slot {})",
        report.address.address,
        report.record.message,
        report.record.counter,
        report.confirmation.slot
    );

    Ok(())
}
