//! Fundamental types for the Zar DAO governance core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, ledger positions, content-derived identifiers and the
//! `Action` tuple that proposals and scheduled operations are built from.

pub mod action;
pub mod address;
pub mod error;
pub mod hash;
pub mod position;

pub use action::Action;
pub use address::Address;
pub use error::TypesError;
pub use hash::{DescriptionHash, OperationId, ProposalId};
pub use position::{LedgerPoint, Position};
