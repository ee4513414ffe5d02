//! Governor: proposals through the Pending → Active → Succeeded → Queued →
//! Executed lifecycle, with voting weight read from the vote-weight ledger and
//! execution routed through the timelock.

use crate::error::GovernanceError;
use crate::params::{GovernorSettings, SnapshotPolicy, QUORUM_DENOMINATOR};
use crate::proposal::{Proposal, ProposalState, QueuedOperation, Tally, VoteReceipt, VoteType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zar_crypto::{hash_description, hash_proposal};
use zar_ledger::Dispatcher;
use zar_timelock::Timelock;
use zar_types::{Action, Address, DescriptionHash, LedgerPoint, OperationId, Position, ProposalId};
use zar_votes::VoteWeightLedger;

/// The decision engine.
///
/// The governor holds no tokens and no funds. It reads weight from a
/// [`VoteWeightLedger`] and, for passed proposals, schedules and executes
/// through a [`Timelock`] in which its own address holds the proposer and
/// executor roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Governor {
    name: String,
    address: Address,
    settings: GovernorSettings,
    proposals: BTreeMap<ProposalId, Proposal>,
    /// Creation order.
    order: Vec<ProposalId>,
    receipts: BTreeMap<ProposalId, BTreeMap<Address, VoteReceipt>>,
}

impl Governor {
    pub fn new(
        name: impl Into<String>,
        address: Address,
        settings: GovernorSettings,
    ) -> Result<Self, GovernanceError> {
        settings.validate()?;
        Ok(Self {
            name: name.into(),
            address,
            settings,
            proposals: BTreeMap::new(),
            order: Vec::new(),
            receipts: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn settings(&self) -> &GovernorSettings {
        &self.settings
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Deterministic identity of a proposal; no state is touched.
    pub fn hash_proposal(actions: &[Action], description_hash: &DescriptionHash) -> ProposalId {
        hash_proposal(actions, description_hash)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    /// All proposals in creation order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.order.iter().filter_map(|id| self.proposals.get(id))
    }

    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Position, GovernanceError> {
        Ok(self.proposal(id)?.snapshot)
    }

    /// First position after the voting window.
    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Position, GovernanceError> {
        Ok(self.proposal(id)?.vote_end)
    }

    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<&Address, GovernanceError> {
        Ok(&self.proposal(id)?.proposer)
    }

    /// Position at which a queued proposal becomes executable.
    pub fn proposal_eta(&self, id: &ProposalId) -> Result<Option<Position>, GovernanceError> {
        Ok(self.proposal(id)?.queued.as_ref().map(|q| q.eta))
    }

    pub fn proposal_votes(&self, id: &ProposalId) -> Result<Tally, GovernanceError> {
        Ok(self.proposal(id)?.tally)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.receipts
            .get(id)
            .is_some_and(|r| r.contains_key(voter))
    }

    pub fn receipt(&self, id: &ProposalId, voter: &Address) -> Option<&VoteReceipt> {
        self.receipts.get(id).and_then(|r| r.get(voter))
    }

    /// Votes required at `at`: a fixed fraction of the total supply there.
    pub fn quorum(
        &self,
        token: &VoteWeightLedger,
        at: Position,
        now: LedgerPoint,
    ) -> Result<u128, GovernanceError> {
        let supply = token.get_past_total_supply(at, now)?;
        let scaled = supply
            .checked_mul(self.settings.quorum_numerator)
            .ok_or(GovernanceError::Overflow("quorum"))?;
        Ok(scaled / QUORUM_DENOMINATOR)
    }

    /// Current lifecycle state, derived from the tallies, the position and
    /// the timelock's record of the queued operation.
    pub fn state(
        &self,
        id: &ProposalId,
        token: &VoteWeightLedger,
        timelock: &Timelock,
        now: LedgerPoint,
    ) -> Result<ProposalState, GovernanceError> {
        let p = self.proposal(id)?;
        if p.executed_at.is_some() {
            return Ok(ProposalState::Executed);
        }
        if p.canceled {
            return Ok(ProposalState::Canceled);
        }
        if now.position < p.vote_start {
            return Ok(ProposalState::Pending);
        }
        if now.position < p.vote_end {
            return Ok(ProposalState::Active);
        }
        if let Some(queued) = &p.queued {
            if timelock.is_operation_done(&queued.operation) {
                return Ok(ProposalState::Executed);
            }
            // Dropped by the timelock admin.
            if !timelock.is_operation(&queued.operation) {
                return Ok(ProposalState::Canceled);
            }
            if now.position >= queued.eta.saturating_add(self.settings.grace_period) {
                return Ok(ProposalState::Expired);
            }
            return Ok(ProposalState::Queued);
        }

        let quorum = self.quorum(token, p.snapshot, now)?;
        let participation = p.tally.participation(self.settings.quorum_policy);
        if participation >= quorum && p.tally.majority_for() {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Create a proposal. Its identity is the hash of the actions and the
    /// description hash, so resubmitting the same content fails.
    pub fn propose(
        &mut self,
        proposer: &Address,
        actions: Vec<Action>,
        description: impl Into<String>,
        token: &VoteWeightLedger,
        now: LedgerPoint,
    ) -> Result<ProposalId, GovernanceError> {
        if actions.is_empty() {
            return Err(GovernanceError::EmptyActions);
        }

        let threshold = self.settings.proposal_threshold;
        if threshold > 0 {
            let weight = if now.position == Position::GENESIS {
                0
            } else {
                token.get_past_votes(proposer, now.position.saturating_sub(1), now)?
            };
            if weight < threshold {
                tracing::warn!(%proposer, weight, threshold, "proposer below threshold");
                return Err(GovernanceError::Unauthorized {
                    account: proposer.clone(),
                    reason: format!("voting weight {weight} is below the proposal threshold {threshold}"),
                });
            }
        }

        let description = description.into();
        let description_hash = hash_description(&description);
        let id = hash_proposal(&actions, &description_hash);
        if self.proposals.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let snapshot = match self.settings.snapshot_policy {
            SnapshotPolicy::OneBefore => now.position.saturating_sub(1),
            SnapshotPolicy::AtCreation => now.position,
        };
        // Votes read weight at the snapshot, which must be final before voting opens.
        let vote_start = snapshot.saturating_add(self.settings.voting_delay.max(1));
        let vote_end = vote_start.saturating_add(self.settings.voting_period);

        tracing::info!(
            proposal = %id,
            %proposer,
            actions = actions.len(),
            %snapshot,
            %vote_start,
            %vote_end,
            "proposal created"
        );

        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: proposer.clone(),
                actions,
                description,
                description_hash,
                created_at: now,
                snapshot,
                vote_start,
                vote_end,
                tally: Tally::default(),
                canceled: false,
                queued: None,
                executed_at: None,
            },
        );
        self.order.push(id);
        Ok(id)
    }

    /// Cast a ballot. Returns the weight counted, which is zero for an
    /// account with no delegated weight at the snapshot.
    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: VoteType,
        token: &VoteWeightLedger,
        timelock: &Timelock,
        now: LedgerPoint,
    ) -> Result<u128, GovernanceError> {
        self.cast_vote_with_reason(voter, id, support, None, token, timelock, now)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote_with_reason(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: VoteType,
        reason: Option<String>,
        token: &VoteWeightLedger,
        timelock: &Timelock,
        now: LedgerPoint,
    ) -> Result<u128, GovernanceError> {
        self.expect_state(id, ProposalState::Active, token, timelock, now)?;
        if self.has_voted(id, voter) {
            return Err(GovernanceError::DoubleVote {
                voter: voter.clone(),
                id: *id,
            });
        }

        let snapshot = self.proposal(id)?.snapshot;
        let weight = token.get_past_votes(voter, snapshot, now)?;

        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))?;
        proposal.tally.add(support, weight)?;
        self.receipts.entry(*id).or_default().insert(
            voter.clone(),
            VoteReceipt {
                support,
                weight,
                reason: reason.clone(),
                cast_at: now,
            },
        );

        tracing::info!(
            proposal = %id,
            %voter,
            support = ?support,
            weight,
            reason = reason.as_deref().unwrap_or(""),
            "vote cast"
        );
        Ok(weight)
    }

    /// Schedule a succeeded proposal in the timelock with the minimum delay.
    pub fn queue(
        &mut self,
        id: &ProposalId,
        token: &VoteWeightLedger,
        timelock: &mut Timelock,
        now: LedgerPoint,
    ) -> Result<OperationId, GovernanceError> {
        self.expect_state(id, ProposalState::Succeeded, token, timelock, now)?;
        let proposal = self.proposal(id)?;
        let delay = timelock.min_delay();
        let operation = timelock.schedule_batch(
            &self.address,
            proposal.actions.clone(),
            OperationId::ZERO,
            proposal.salt(),
            delay,
            now,
        )?;
        let eta = timelock
            .ready_at(&operation)
            .unwrap_or_else(|| now.position.saturating_add(delay));

        if let Some(p) = self.proposals.get_mut(id) {
            p.queued = Some(QueuedOperation {
                operation,
                eta,
                queued_at: now,
            });
        }
        tracing::info!(proposal = %id, %operation, %eta, "proposal queued");
        Ok(operation)
    }

    /// Execute a queued proposal through the timelock. All actions are
    /// dispatched atomically with the timelock as caller.
    pub fn execute<D: Dispatcher + ?Sized>(
        &mut self,
        id: &ProposalId,
        token: &VoteWeightLedger,
        timelock: &mut Timelock,
        dispatcher: &mut D,
        now: LedgerPoint,
    ) -> Result<OperationId, GovernanceError> {
        match self.state(id, token, timelock, now)? {
            ProposalState::Queued => {}
            ProposalState::Executed => return Err(GovernanceError::AlreadyExecuted(*id)),
            ProposalState::Expired => return Err(GovernanceError::ProposalExpired(*id)),
            current => {
                return Err(GovernanceError::InvalidState {
                    id: *id,
                    current,
                    expected: "Queued",
                })
            }
        }
        let proposal = self.proposal(id)?;
        let salt = proposal.salt();
        let operation = timelock.execute_batch(
            &self.address,
            &proposal.actions,
            &OperationId::ZERO,
            &salt,
            now,
            dispatcher,
        )?;

        if let Some(p) = self.proposals.get_mut(id) {
            p.executed_at = Some(now);
        }
        tracing::info!(proposal = %id, %operation, "proposal executed");
        Ok(operation)
    }

    /// Withdraw a proposal before voting opens. Only the proposer or the
    /// configured guardian may cancel.
    pub fn cancel(
        &mut self,
        caller: &Address,
        id: &ProposalId,
        token: &VoteWeightLedger,
        timelock: &Timelock,
        now: LedgerPoint,
    ) -> Result<(), GovernanceError> {
        let proposal = self.proposal(id)?;
        let is_guardian = self.settings.guardian.as_ref() == Some(caller);
        if &proposal.proposer != caller && !is_guardian {
            return Err(GovernanceError::Unauthorized {
                account: caller.clone(),
                reason: "only the proposer or guardian may cancel".into(),
            });
        }
        self.expect_state(id, ProposalState::Pending, token, timelock, now)?;

        if let Some(p) = self.proposals.get_mut(id) {
            p.canceled = true;
        }
        tracing::warn!(proposal = %id, sender = %caller, "proposal canceled");
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }

    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let governor: Self = bincode::deserialize(data)
            .map_err(|e| GovernanceError::Serialization(e.to_string()))?;
        governor.settings.validate()?;
        Ok(governor)
    }

    fn expect_state(
        &self,
        id: &ProposalId,
        expected: ProposalState,
        token: &VoteWeightLedger,
        timelock: &Timelock,
        now: LedgerPoint,
    ) -> Result<(), GovernanceError> {
        let current = self.state(id, token, timelock, now)?;
        if current != expected {
            return Err(GovernanceError::InvalidState {
                id: *id,
                current,
                expected: expected.name(),
            });
        }
        Ok(())
    }
}
