//! # Algorithms Module
//!
//! Pure, network-free algorithms: the schema codec and address derivation.

pub mod codec;
pub mod derivation;

pub use codec::{
    decode, decode_exact, decode_prefix, decode_typed, encode, encode_typed, min_size, size_of,
};
pub use derivation::{derive, derive_seeded};
