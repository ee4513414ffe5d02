//! Zar DAO runtime.
//!
//! Wires the vote-weight ledger, the timelock, the governor and the contract
//! registry onto a single sequenced ledger. Each mutating call on [`Dao`] is
//! one ledger transaction.

pub mod config;
pub mod dao;
pub mod error;

pub use config::{DaoConfig, GovernorConfig, LedgerConfig, TimelockConfig, TokenConfig};
pub use dao::Dao;
pub use error::DaoError;
