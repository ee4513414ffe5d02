//! Treasury contract.
//!
//! Holds native funds under the ledger's balance table and exposes one
//! privileged operation, `release`, which pays the entire balance to a fixed
//! payee. Only the current owner may call it; in a deployed DAO the owner is
//! the timelock, so funds move only when a proposal has passed and waited out
//! its delay.

pub mod error;
pub mod treasury;

pub use error::TreasuryError;
pub use treasury::{Treasury, TreasuryCall};
