//! Runtime configuration, read from `HELLO_*` environment variables.

use std::path::PathBuf;

use seeded_account::{ClientConfig, GreetingAccount};
use tracing::warn;

/// Message written when `HELLO_MESSAGE` is unset.
pub const DEFAULT_MESSAGE: &str = "Hello World -- Chuck Norris";

/// Lamports credited to the payer when `HELLO_AIRDROP_LAMPORTS` is unset.
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 1_000_000_000;

/// Everything the binary needs to run once.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Directory keypair names are resolved against.
    pub keypair_dir: PathBuf,
    /// Payer keypair name; an ephemeral keypair is used when absent.
    pub payer_keypair: Option<String>,
    /// Program keypair name; an ephemeral keypair is used when absent.
    pub program_keypair: Option<String>,
    /// Record to write.
    pub greeting: GreetingAccount,
    /// Lamports credited to the payer before running.
    pub airdrop_lamports: u64,
    /// Workflow configuration.
    pub client: ClientConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            keypair_dir: PathBuf::from("."),
            payer_keypair: None,
            program_keypair: None,
            greeting: GreetingAccount::new(DEFAULT_MESSAGE, 0),
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            client: ClientConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Unparseable values are logged and
    /// left at their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("HELLO_KEYPAIR_DIR") {
            config.keypair_dir = PathBuf::from(dir);
        }
        config.payer_keypair = lookup("HELLO_PAYER_KEYPAIR");
        config.program_keypair = lookup("HELLO_PROGRAM_KEYPAIR");

        if let Some(seed) = lookup("HELLO_SEED") {
            config.client.seed = seed;
        }
        if let Some(message) = lookup("HELLO_MESSAGE") {
            config.greeting.message = message;
        }
        if let Some(counter) = parsed(&lookup, "HELLO_COUNTER") {
            config.greeting.counter = counter;
        }
        if let Some(timeout) = parsed(&lookup, "HELLO_CONFIRM_TIMEOUT_MS") {
            config.client.confirm_timeout_ms = timeout;
        }
        if let Some(lamports) = parsed(&lookup, "HELLO_AIRDROP_LAMPORTS") {
            config.airdrop_lamports = lamports;
        }

        config
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} must be a non-negative integer, ignoring {:?}", key, raw);
            None
        }
    }
}
