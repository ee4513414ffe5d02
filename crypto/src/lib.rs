//! Hashing primitives for the Zar DAO.
//!
//! - **Blake2b-256** for every content-derived identity (proposals, timelock operations)
//! - Contract address derivation with `zar_` prefix and hex encoding
//!
//! All encodings fed into the hasher are fixed-order and length-prefixed; see
//! [`hash::encode_actions`] for the exact layout.

pub mod address;
pub mod hash;

pub use address::derive_contract_address;
pub use hash::{
    blake2b_256, blake2b_256_multi, hash_description, hash_operation_batch, hash_proposal,
};
