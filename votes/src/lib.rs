//! Vote-weight ledger for the Zar DAO.
//!
//! A fungible token whose holders assign their balance as voting weight to a
//! delegate (possibly themselves). Weight changes are recorded as append-only
//! checkpoints so that the weight of any account at any past position can be
//! read without replaying history.
//!
//! Key principle: an undelegated balance carries no weight. Holders must call
//! `delegate` (usually to themselves) before their tokens count.

pub mod checkpoint;
pub mod error;
pub mod ledger;

pub use checkpoint::{Checkpoint, CheckpointSeries};
pub use error::VotesError;
pub use ledger::{TokenMetadata, VoteWeightLedger};
