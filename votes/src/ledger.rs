//! Token balances with delegated, checkpointed voting weight.

use crate::checkpoint::{Checkpoint, CheckpointSeries};
use crate::error::VotesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zar_types::{Address, LedgerPoint, Position};

/// Descriptive token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Fungible balance ledger with a delegation relation and per-delegate
/// weight history.
///
/// Invariant: the latest weight of every delegate equals the sum of the
/// balances of all accounts currently delegating to it. Every mutation that
/// changes a delegate's weight appends a checkpoint; nothing is rewritten.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteWeightLedger {
    metadata: TokenMetadata,
    balances: BTreeMap<Address, u128>,
    /// account → delegate receiving its balance as weight.
    delegates: BTreeMap<Address, Address>,
    /// delegate → weight history.
    weights: BTreeMap<Address, CheckpointSeries>,
    total_supply: CheckpointSeries,
}

/// New latest weights for the delegates touched by one mutation.
type WeightUpdates = Vec<(Address, u128)>;

impl VoteWeightLedger {
    pub fn new(metadata: TokenMetadata) -> Self {
        Self {
            metadata,
            balances: BTreeMap::new(),
            delegates: BTreeMap::new(),
            weights: BTreeMap::new(),
            total_supply: CheckpointSeries::new(),
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply.latest()
    }

    /// The account currently receiving `account`'s weight, if any.
    pub fn delegates(&self, account: &Address) -> Option<&Address> {
        self.delegates.get(account)
    }

    /// Current voting weight of `account`.
    pub fn get_votes(&self, account: &Address) -> u128 {
        self.weights.get(account).map(|s| s.latest()).unwrap_or(0)
    }

    /// Voting weight of `account` as of position `at`.
    ///
    /// Only finalised positions (strictly before `now`) can be queried.
    pub fn get_past_votes(
        &self,
        account: &Address,
        at: Position,
        now: LedgerPoint,
    ) -> Result<u128, VotesError> {
        ensure_final(at, now)?;
        Ok(self
            .weights
            .get(account)
            .map(|s| s.value_at(at))
            .unwrap_or(0))
    }

    /// Total supply as of position `at`.
    pub fn get_past_total_supply(&self, at: Position, now: LedgerPoint) -> Result<u128, VotesError> {
        ensure_final(at, now)?;
        Ok(self.total_supply.value_at(at))
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.weights.get(account).map(|s| s.len()).unwrap_or(0)
    }

    pub fn checkpoint(&self, account: &Address, index: usize) -> Option<&Checkpoint> {
        self.weights.get(account).and_then(|s| s.get(index))
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(&mut self, to: &Address, amount: u128, now: LedgerPoint) -> Result<(), VotesError> {
        if amount == 0 {
            return Err(VotesError::ZeroAmount);
        }
        let supply = self
            .total_supply()
            .checked_add(amount)
            .ok_or(VotesError::Overflow("total supply"))?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(VotesError::Overflow("balance"))?;
        let updates = self.plan_move(None, self.delegates(to), amount)?;
        self.ensure_writable(&updates, now, true)?;

        self.total_supply.push(now, supply)?;
        self.balances.insert(to.clone(), balance);
        self.commit_weights(updates, now)?;
        tracing::debug!(%to, amount, supply, "minted");
        Ok(())
    }

    /// Destroy `amount` tokens held by `from`.
    pub fn burn(&mut self, from: &Address, amount: u128, now: LedgerPoint) -> Result<(), VotesError> {
        if amount == 0 {
            return Err(VotesError::ZeroAmount);
        }
        let balance = self.require_balance(from, amount)?;
        let supply = self
            .total_supply()
            .checked_sub(amount)
            .ok_or(VotesError::Overflow("total supply"))?;
        let updates = self.plan_move(self.delegates(from), None, amount)?;
        self.ensure_writable(&updates, now, true)?;

        self.total_supply.push(now, supply)?;
        self.balances.insert(from.clone(), balance - amount);
        self.commit_weights(updates, now)?;
        tracing::debug!(%from, amount, supply, "burned");
        Ok(())
    }

    /// Move `amount` tokens from `from` to `to`, carrying weight between
    /// their delegates.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
        now: LedgerPoint,
    ) -> Result<(), VotesError> {
        let from_balance = self.require_balance(from, amount)?;
        if amount == 0 || from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(VotesError::Overflow("balance"))?;
        let updates = self.plan_move(self.delegates(from), self.delegates(to), amount)?;
        self.ensure_writable(&updates, now, false)?;

        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), to_balance);
        self.commit_weights(updates, now)?;
        tracing::debug!(%from, %to, amount, "transferred");
        Ok(())
    }

    /// Assign `account`'s balance as weight to `target` (may be itself).
    ///
    /// Writes a checkpoint for the previous delegate (losing weight) and for
    /// the new one (gaining it). Re-delegating to the current delegate is a no-op.
    pub fn delegate(
        &mut self,
        account: &Address,
        target: &Address,
        now: LedgerPoint,
    ) -> Result<(), VotesError> {
        let previous = self.delegates(account).cloned();
        if previous.as_ref() == Some(target) {
            return Ok(());
        }
        let amount = self.balance_of(account);
        let updates = self.plan_move(previous.as_ref(), Some(target), amount)?;
        self.ensure_writable(&updates, now, false)?;

        self.delegates.insert(account.clone(), target.clone());
        self.commit_weights(updates, now)?;
        tracing::debug!(
            delegator = %account,
            from = ?previous,
            to = %target,
            "delegate changed"
        );
        Ok(())
    }

    /// Serialize the full ledger for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, VotesError> {
        bincode::serialize(self).map_err(|e| VotesError::Serialization(e.to_string()))
    }

    /// Restore a ledger saved with [`VoteWeightLedger::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, VotesError> {
        bincode::deserialize(data).map_err(|e| VotesError::Serialization(e.to_string()))
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_balance(&self, account: &Address, amount: u128) -> Result<u128, VotesError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(VotesError::InsufficientBalance {
                account: account.clone(),
                needed: amount,
                available,
            });
        }
        Ok(available)
    }

    /// Compute the new weights of `src` (losing `amount`) and `dst` (gaining it).
    fn plan_move(
        &self,
        src: Option<&Address>,
        dst: Option<&Address>,
        amount: u128,
    ) -> Result<WeightUpdates, VotesError> {
        let mut updates = Vec::new();
        if amount == 0 || src == dst {
            return Ok(updates);
        }
        if let Some(src) = src {
            let weight = self
                .get_votes(src)
                .checked_sub(amount)
                .ok_or(VotesError::Overflow("delegate weight"))?;
            updates.push((src.clone(), weight));
        }
        if let Some(dst) = dst {
            let weight = self
                .get_votes(dst)
                .checked_add(amount)
                .ok_or(VotesError::Overflow("delegate weight"))?;
            updates.push((dst.clone(), weight));
        }
        Ok(updates)
    }

    /// Check that every series about to be written accepts `now`, so a
    /// mutation either writes all of its checkpoints or none.
    fn ensure_writable(
        &self,
        updates: &[(Address, u128)],
        now: LedgerPoint,
        supply: bool,
    ) -> Result<(), VotesError> {
        let series = updates
            .iter()
            .filter_map(|(delegate, _)| self.weights.get(delegate))
            .chain(supply.then_some(&self.total_supply));
        for s in series {
            if let Some(last) = s.last() {
                if now <= last.at {
                    return Err(VotesError::NonMonotonicCheckpoint {
                        latest: last.at,
                        attempted: now,
                    });
                }
            }
        }
        Ok(())
    }

    fn commit_weights(&mut self, updates: WeightUpdates, now: LedgerPoint) -> Result<(), VotesError> {
        for (delegate, weight) in updates {
            let series = self.weights.entry(delegate.clone()).or_default();
            let previous = series.latest();
            series.push(now, weight)?;
            tracing::debug!(%delegate, previous, weight, "delegate votes changed");
        }
        Ok(())
    }
}

fn ensure_final(at: Position, now: LedgerPoint) -> Result<(), VotesError> {
    if at >= now.position {
        return Err(VotesError::FutureLookup {
            requested: at,
            current: now.position,
        });
    }
    Ok(())
}
