//! # Domain Module
//!
//! Core types: identities, keypairs, schemas, operations and errors.

pub mod errors;
pub mod keypair;
pub mod schema;
pub mod value_objects;

pub use errors::*;
pub use keypair::*;
pub use schema::*;
pub use value_objects::*;
