//! # Domain Errors
//!
//! One closed error enum per component, plus the step-tagged
//! [`WorkflowError`] that carries them up to the caller.

use std::path::PathBuf;

use thiserror::Error;

use super::value_objects::{Identity, MAX_SEED_LEN};

/// Address derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// Seed exceeds the ledger's seed length limit.
    #[error("Seed too long: {len} bytes > {max}", max = MAX_SEED_LEN)]
    SeedTooLong {
        /// Seed length in bytes
        len: usize,
    },

    /// Owner ends with the program-derived-address marker.
    #[error("Illegal owner {0}: reserved program-derived-address marker")]
    IllegalOwner(Identity),
}

/// Schema codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes remain than the field needs.
    #[error("Truncated input at field '{field}': need {needed} bytes, {remaining} remain")]
    Truncated {
        /// Field being decoded
        field: &'static str,
        /// Bytes the field requires
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// String field bytes are not UTF-8.
    #[error("Invalid UTF-8 in string field '{field}'")]
    InvalidUtf8 {
        /// Field being decoded
        field: &'static str,
    },

    /// Record does not conform to the schema it is encoded with.
    #[error("Record does not match schema '{schema}': {reason}")]
    SchemaMismatch {
        /// Schema name
        schema: &'static str,
        /// What did not match
        reason: String,
    },

    /// Bytes left over after the last field.
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),
}

/// Ledger port errors, raised by [`crate::ports::LedgerClient`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No confirmation arrived in time.
    #[error("Ledger confirmation timed out")]
    Timeout,

    /// The ledger refused the operation.
    #[error("Ledger rejected operation: {0}")]
    Rejected(String),

    /// The ledger could not be reached.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Provisioning errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// Create was submitted but not confirmed, and the account is still absent.
    #[error("Account creation failed: {0}")]
    CreationFailed(String),

    /// Existence check failed.
    #[error("Account lookup failed: {0}")]
    LookupFailed(LedgerError),
}

/// Operation submission errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Confirmation did not arrive within the bound.
    #[error("Confirmation timed out after {timeout_ms}ms")]
    Timeout {
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// The ledger rejected the operation.
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// The ledger could not be reached.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl SubmissionError {
    /// Map a port error, keeping the configured bound for timeouts.
    pub fn from_ledger(err: LedgerError, timeout_ms: u64) -> Self {
        match err {
            LedgerError::Timeout => SubmissionError::Timeout { timeout_ms },
            LedgerError::Rejected(reason) => SubmissionError::Rejected(reason),
            LedgerError::Unavailable(reason) => SubmissionError::Unavailable(reason),
        }
    }
}

/// Keypair loading errors.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    /// Keypair file could not be read.
    #[error("Failed to read keypair {path:?}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File contents are not a JSON byte array of the right length.
    #[error("Malformed keypair {path:?}: {reason}")]
    Malformed {
        /// File path
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// Secret and public halves do not belong together.
    #[error("Invalid keypair {path:?}: public key does not match secret key")]
    InvalidKeypair {
        /// File path
        path: PathBuf,
    },
}

/// Workflow errors, tagged with the step and address they occurred at.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Deriving the storage address failed.
    #[error("derive: {0}")]
    Derivation(#[from] DerivationError),

    /// The owning program is not deployed.
    #[error("check-program: program {program} is not deployed")]
    ProgramNotDeployed {
        /// Program identity
        program: Identity,
    },

    /// Looking up the program failed.
    #[error("check-program: lookup of {program} failed: {source}")]
    ProgramLookup {
        /// Program identity
        program: Identity,
        /// Port error
        #[source]
        source: LedgerError,
    },

    /// Provisioning the storage account failed.
    #[error("provision {address}: {source}")]
    Provision {
        /// Derived address
        address: Identity,
        /// Provisioner error
        #[source]
        source: ProvisionError,
    },

    /// Encoding the record failed.
    #[error("encode: {0}")]
    Encode(#[source] CodecError),

    /// Submitting the write failed.
    #[error("submit {address}: {source}")]
    Submission {
        /// Derived address
        address: Identity,
        /// Submitter error
        #[source]
        source: SubmissionError,
    },

    /// Reading the account back failed.
    #[error("read-back {address}: {source}")]
    ReadBack {
        /// Derived address
        address: Identity,
        /// Port error
        #[source]
        source: LedgerError,
    },

    /// The account vanished before read-back.
    #[error("read-back {address}: cannot find the account")]
    AccountMissing {
        /// Derived address
        address: Identity,
    },

    /// Stored bytes did not decode.
    #[error("decode {address}: {source}")]
    Decode {
        /// Derived address
        address: Identity,
        /// Codec error
        #[source]
        source: CodecError,
    },

    /// Stored record differs from the one written.
    #[error("read-back {address}: stored record does not match the submitted one")]
    ReadBackMismatch {
        /// Derived address
        address: Identity,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_too_long_error() {
        let err = DerivationError::SeedTooLong { len: 33 };
        assert!(err.to_string().contains("33 bytes > 32"));
    }

    #[test]
    fn test_truncated_error_names_field() {
        let err = CodecError::Truncated {
            field: "counter",
            needed: 4,
            remaining: 1,
        };
        assert!(err.to_string().contains("counter"));
    }

    #[test]
    fn test_submission_from_ledger_keeps_timeout_bound() {
        let err = SubmissionError::from_ledger(LedgerError::Timeout, 1500);
        assert_eq!(err, SubmissionError::Timeout { timeout_ms: 1500 });

        let err = SubmissionError::from_ledger(LedgerError::Rejected("nope".into()), 1500);
        assert_eq!(err, SubmissionError::Rejected("nope".into()));
    }

    #[test]
    fn test_workflow_error_names_step_and_address() {
        let address = Identity::new([7u8; 32]);
        let err = WorkflowError::Provision {
            address,
            source: ProvisionError::CreationFailed("insufficient funds".into()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("provision"));
        assert!(msg.contains(&address.to_string()));
        assert!(msg.contains("insufficient funds"));
    }
}
