//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod context;
pub mod provisioner;
pub mod submitter;
pub mod workflow;

pub use context::LedgerContext;
pub use provisioner::Provisioner;
pub use submitter::OperationSubmitter;
pub use workflow::{RecordWorkflow, WorkflowReport};
