//! # Client Configuration
//!
//! Configuration for the workflow and for the in-memory ledger adapter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seed used when none is configured.
pub const DEFAULT_SEED: &str = "hello";

/// How the workflow sizes a new storage account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityPolicy {
    /// Size of the schema's zero-valued instance. Any record with a
    /// non-empty string field will not fit.
    SchemaDefault,
    /// Largest of the zero-valued size and the record being written.
    FitRecord,
    /// Fixed capacity in bytes.
    Exact(usize),
}

impl CapacityPolicy {
    /// Capacity for a schema whose default size is `default_size` when
    /// writing a record of `record_size` bytes.
    pub fn resolve(self, default_size: usize, record_size: usize) -> usize {
        match self {
            CapacityPolicy::SchemaDefault => default_size,
            CapacityPolicy::FitRecord => default_size.max(record_size),
            CapacityPolicy::Exact(size) => size,
        }
    }
}

/// Workflow configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Seed the storage address is derived from.
    pub seed: String,

    /// Bound on every ledger round trip, in milliseconds.
    pub confirm_timeout_ms: u64,

    /// Storage sizing for new accounts.
    pub capacity: CapacityPolicy,

    /// Fail the workflow when the read-back record differs from the one sent.
    pub verify_read_back: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            confirm_timeout_ms: 30_000,
            capacity: CapacityPolicy::FitRecord,
            verify_read_back: true,
        }
    }
}

impl ClientConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing() -> Self {
        Self {
            confirm_timeout_ms: 500,
            ..Self::default()
        }
    }

    /// Confirmation bound as a duration.
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }
}

/// In-memory ledger configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Rent charged per byte per year.
    pub lamports_per_byte_year: u64,

    /// Years of rent an account must hold to be exempt.
    pub exemption_threshold_years: u64,

    /// Bytes of bookkeeping charged on top of the data.
    pub account_storage_overhead: u64,

    /// Largest data allocation accepted.
    pub max_data_len: u64,

    /// Delay before an operation is confirmed, in milliseconds.
    pub confirmation_latency_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3_480,
            exemption_threshold_years: 2,
            account_storage_overhead: 128,
            max_data_len: 10 * 1024 * 1024,
            confirmation_latency_ms: 0,
        }
    }
}

impl LedgerConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Same config with a confirmation delay.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.confirmation_latency_ms = latency_ms;
        self
    }
}
