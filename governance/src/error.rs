use thiserror::Error;
use zar_timelock::TimelockError;
use zar_types::{Address, ProposalId};
use zar_votes::VotesError;

use crate::proposal::ProposalState;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("a proposal must contain at least one action")]
    EmptyActions,

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("{account} is not authorized: {reason}")]
    Unauthorized { account: Address, reason: String },

    #[error("proposal {id} is {current}, expected {expected}")]
    InvalidState {
        id: ProposalId,
        current: ProposalState,
        expected: &'static str,
    },

    #[error("{voter} has already voted on proposal {id}")]
    DoubleVote { voter: Address, id: ProposalId },

    #[error("proposal {0} has expired")]
    ProposalExpired(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("invalid vote type {0}")]
    InvalidVoteType(u8),

    #[error("invalid governor settings: {0}")]
    InvalidSettings(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("vote weight lookup failed: {0}")]
    Votes(#[from] VotesError),

    #[error("timelock rejected the operation: {0}")]
    Timelock(#[from] TimelockError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
