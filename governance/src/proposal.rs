//! Proposals, their derived lifecycle state and the vote tally.

use crate::error::GovernanceError;
use crate::params::QuorumPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use zar_types::{Action, Address, DescriptionHash, LedgerPoint, OperationId, Position, ProposalId};

/// Lifecycle phases of a proposal. The discriminants are stable and part of
/// the public surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProposalState {
    /// Created; voting has not opened yet.
    Pending = 0,
    /// Inside the voting window.
    Active = 1,
    /// Withdrawn by the proposer or guardian, or dropped from the timelock.
    Canceled = 2,
    /// Voting closed without reaching quorum or a strict majority.
    Defeated = 3,
    /// Voting closed with quorum and more for than against.
    Succeeded = 4,
    /// Scheduled in the timelock.
    Queued = 5,
    /// Queued but not executed within the grace period.
    Expired = 6,
    /// Actions dispatched.
    Executed = 7,
}

impl ProposalState {
    pub fn name(&self) -> &'static str {
        match self {
            ProposalState::Pending => "Pending",
            ProposalState::Active => "Active",
            ProposalState::Canceled => "Canceled",
            ProposalState::Defeated => "Defeated",
            ProposalState::Succeeded => "Succeeded",
            ProposalState::Queued => "Queued",
            ProposalState::Expired => "Expired",
            ProposalState::Executed => "Executed",
        }
    }

    /// No further transition is possible.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ProposalState::Canceled
                | ProposalState::Defeated
                | ProposalState::Expired
                | ProposalState::Executed
        )
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Support value of a ballot. Encoded on the wire as 0, 1, 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteType {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for VoteType {
    type Error = GovernanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteType::Against),
            1 => Ok(VoteType::For),
            2 => Ok(VoteType::Abstain),
            other => Err(GovernanceError::InvalidVoteType(other)),
        }
    }
}

impl From<VoteType> for u8 {
    fn from(v: VoteType) -> u8 {
        v as u8
    }
}

/// Accumulated weight per support value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub against: u128,
    pub for_votes: u128,
    pub abstain: u128,
}

impl Tally {
    pub fn add(&mut self, support: VoteType, weight: u128) -> Result<(), GovernanceError> {
        let slot = match support {
            VoteType::Against => &mut self.against,
            VoteType::For => &mut self.for_votes,
            VoteType::Abstain => &mut self.abstain,
        };
        *slot = slot
            .checked_add(weight)
            .ok_or(GovernanceError::Overflow("vote tally"))?;
        Ok(())
    }

    /// Weight counted toward quorum under `policy`.
    pub fn participation(&self, policy: QuorumPolicy) -> u128 {
        let base = self.for_votes.saturating_add(self.abstain);
        match policy {
            QuorumPolicy::AllParticipating => base.saturating_add(self.against),
            QuorumPolicy::ForAndAbstain => base,
        }
    }

    /// Strictly more for than against; a tie fails.
    pub fn majority_for(&self) -> bool {
        self.for_votes > self.against
    }
}

/// One recorded ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub support: VoteType,
    /// Weight at the proposal snapshot; zero for accounts with no delegated weight.
    pub weight: u128,
    pub reason: Option<String>,
    pub cast_at: LedgerPoint,
}

/// Timelock bookkeeping for a queued proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub operation: OperationId,
    /// First position at which the timelock accepts execution.
    pub eta: Position,
    pub queued_at: LedgerPoint,
}

/// A governance proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub actions: Vec<Action>,
    pub description: String,
    pub description_hash: DescriptionHash,
    pub created_at: LedgerPoint,
    /// Position at which voting weight and quorum supply are read.
    pub snapshot: Position,
    /// First position of the voting window.
    pub vote_start: Position,
    /// First position after the voting window.
    pub vote_end: Position,
    pub tally: Tally,
    pub canceled: bool,
    pub queued: Option<QueuedOperation>,
    pub executed_at: Option<LedgerPoint>,
}

impl Proposal {
    /// Timelock salt used when queueing: the description hash.
    pub fn salt(&self) -> [u8; 32] {
        *self.description_hash.as_bytes()
    }
}
