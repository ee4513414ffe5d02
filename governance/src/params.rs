//! Governor settings.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use zar_types::Address;

/// Quorum is expressed as `quorum_numerator / QUORUM_DENOMINATOR` of the total
/// supply at the proposal snapshot.
pub const QUORUM_DENOMINATOR: u128 = 100;

/// Which tallies count toward quorum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumPolicy {
    /// for + against + abstain.
    #[default]
    AllParticipating,
    /// for + abstain; against votes do not help a proposal reach quorum.
    ForAndAbstain,
}

/// Where the voting-weight snapshot is taken relative to proposal creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// One position before creation: nothing written in the creation block counts.
    #[default]
    OneBefore,
    /// The creation position itself, including writes after the proposal in that block.
    AtCreation,
}

/// Tunable parameters of the governor. All spans are in ledger positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorSettings {
    /// Positions between the snapshot and the start of voting.
    pub voting_delay: u64,
    /// Length of the voting window.
    pub voting_period: u64,
    /// Minimum weight (one position before proposing) needed to propose. Zero disables the check.
    pub proposal_threshold: u128,
    /// Percent of snapshot supply that must participate.
    pub quorum_numerator: u128,
    pub quorum_policy: QuorumPolicy,
    pub snapshot_policy: SnapshotPolicy,
    /// Positions after a queued proposal becomes executable before it expires.
    pub grace_period: u64,
    /// May cancel any pending proposal in addition to its proposer.
    pub guardian: Option<Address>,
}

impl GovernorSettings {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_period == 0 {
            return Err(GovernanceError::InvalidSettings(
                "voting_period must be at least 1".into(),
            ));
        }
        // A queued proposal must stay executable for at least one position.
        if self.grace_period == 0 {
            return Err(GovernanceError::InvalidSettings(
                "grace_period must be at least 1".into(),
            ));
        }
        if self.quorum_numerator > QUORUM_DENOMINATOR {
            return Err(GovernanceError::InvalidSettings(format!(
                "quorum_numerator {} exceeds {}",
                self.quorum_numerator, QUORUM_DENOMINATOR
            )));
        }
        // The snapshot must be final before the first vote reads it.
        if self.snapshot_policy == SnapshotPolicy::AtCreation && self.voting_delay == 0 {
            return Err(GovernanceError::InvalidSettings(
                "at_creation snapshots need voting_delay >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernorSettings {
    fn default() -> Self {
        Self {
            voting_delay: 1,
            voting_period: 5,
            proposal_threshold: 0,
            quorum_numerator: 4,
            quorum_policy: QuorumPolicy::default(),
            snapshot_policy: SnapshotPolicy::default(),
            grace_period: 100_800,
            guardian: None,
        }
    }
}
