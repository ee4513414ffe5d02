//! Token-weighted governance for the Zar DAO.
//!
//! Lifecycle: Pending → Active → (Defeated | Succeeded) → Queued → (Executed | Expired),
//! with Canceled reachable from Pending.
//!
//! State is computed on read from the current position, the tallies and the
//! queue/execution records; it is never stored transition by transition.
//! Voting weight is always read at the proposal's snapshot position, so moving
//! tokens after a proposal is created cannot change its outcome.

pub mod engine;
pub mod error;
pub mod params;
pub mod proposal;

pub use engine::Governor;
pub use error::GovernanceError;
pub use params::{GovernorSettings, QuorumPolicy, SnapshotPolicy, QUORUM_DENOMINATOR};
pub use proposal::{Proposal, ProposalState, QueuedOperation, Tally, VoteReceipt, VoteType};
