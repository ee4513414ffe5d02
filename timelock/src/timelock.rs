//! The gate itself: roles, schedule, execute, cancel.

use crate::error::TimelockError;
use crate::operation::{Operation, OperationState};
use crate::roles::{Role, RoleTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zar_crypto::hash_operation_batch;
use zar_ledger::{decode_calldata, encode_calldata, Dispatcher};
use zar_types::{Action, Address, LedgerPoint, OperationId, Position};

/// Administrative calls an operation can make on the gate that executes it.
///
/// They run with the gate's own address as caller, so they need the gate to
/// hold `Admin` on itself, which it does unless a batch revoked it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockCall {
    GrantRole { role: Role, account: Address },
    RevokeRole { role: Role, account: Address },
    /// Drop another scheduled, unexecuted operation.
    Cancel { id: OperationId },
    UpdateDelay { min_delay: u64 },
}

impl TimelockCall {
    pub fn encode(&self) -> Vec<u8> {
        encode_calldata(self)
    }
}

/// Changes a batch makes to its own gate. Committed only after the rest of
/// the batch dispatched.
struct SelfChanges {
    roles: RoleTable,
    min_delay: u64,
    cancels: Vec<OperationId>,
    applied: Vec<TimelockCall>,
}

/// Role-gated scheduler with a mandatory delay between scheduling and execution.
///
/// When the gate executes a batch, the calls are made with the gate's own
/// address as the caller. Contracts that should only obey passed proposals
/// (the treasury) name this address as their owner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timelock {
    address: Address,
    min_delay: u64,
    roles: RoleTable,
    operations: BTreeMap<OperationId, Operation>,
}

impl Timelock {
    /// Create a gate at `address`.
    ///
    /// The gate holds `Admin` on itself, so its own operations can carry
    /// [`TimelockCall`] actions targeting `address`. An optional bootstrap
    /// `admin` may wire up roles and is expected to renounce `Admin` once the
    /// governor holds the proposer and executor roles.
    pub fn new(
        address: Address,
        min_delay: u64,
        proposers: &[Address],
        executors: &[Address],
        admin: Option<&Address>,
    ) -> Self {
        let mut roles = RoleTable::new();
        roles.grant(Role::Admin, &address);
        if let Some(admin) = admin {
            roles.grant(Role::Admin, admin);
        }
        for p in proposers {
            roles.grant(Role::Proposer, p);
        }
        for e in executors {
            roles.grant(Role::Executor, e);
        }
        Self {
            address,
            min_delay,
            roles,
            operations: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    // ── Role administration ─────────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), TimelockError> {
        self.check_role(Role::Admin, caller)?;
        if self.roles.grant(role, account) {
            tracing::info!(%role, %account, sender = %caller, "role granted");
        }
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), TimelockError> {
        self.check_role(Role::Admin, caller)?;
        if self.roles.revoke(role, account) {
            tracing::info!(%role, %account, sender = %caller, "role revoked");
        }
        Ok(())
    }

    /// Drop one of the caller's own roles.
    pub fn renounce_role(&mut self, caller: &Address, role: Role) {
        if self.roles.revoke(role, caller) {
            tracing::info!(%role, account = %caller, "role renounced");
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn hash_operation_batch(
        actions: &[Action],
        predecessor: &OperationId,
        salt: &[u8; 32],
    ) -> OperationId {
        hash_operation_batch(actions, predecessor, salt)
    }

    pub fn operation(&self, id: &OperationId) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn operation_state(&self, id: &OperationId, now: Position) -> OperationState {
        self.operations
            .get(id)
            .map(|op| op.state(now))
            .unwrap_or(OperationState::Unset)
    }

    pub fn is_operation(&self, id: &OperationId) -> bool {
        self.operations.contains_key(id)
    }

    /// Scheduled and not yet executed.
    pub fn is_operation_pending(&self, id: &OperationId) -> bool {
        self.operations
            .get(id)
            .map(|op| !op.is_executed())
            .unwrap_or(false)
    }

    pub fn is_operation_ready(&self, id: &OperationId, now: Position) -> bool {
        self.operation_state(id, now) == OperationState::Ready
    }

    pub fn is_operation_done(&self, id: &OperationId) -> bool {
        self.operations
            .get(id)
            .map(Operation::is_executed)
            .unwrap_or(false)
    }

    pub fn ready_at(&self, id: &OperationId) -> Option<Position> {
        self.operations.get(id).map(|op| op.ready_at)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Schedule `actions` to become executable `delay` positions from now.
    pub fn schedule_batch(
        &mut self,
        caller: &Address,
        actions: Vec<Action>,
        predecessor: OperationId,
        salt: [u8; 32],
        delay: u64,
        now: LedgerPoint,
    ) -> Result<OperationId, TimelockError> {
        self.check_role(Role::Proposer, caller)?;
        if delay < self.min_delay {
            return Err(TimelockError::DelayTooShort {
                requested: delay,
                minimum: self.min_delay,
            });
        }
        let id = hash_operation_batch(&actions, &predecessor, &salt);
        if let Some(existing) = self.operations.get(&id) {
            return Err(if existing.is_executed() {
                TimelockError::AlreadyExecuted(id)
            } else {
                TimelockError::AlreadyScheduled(id)
            });
        }

        let ready_at = now.position.saturating_add(delay);
        tracing::info!(
            operation = %id,
            actions = actions.len(),
            %ready_at,
            delay,
            "operation scheduled"
        );
        self.operations.insert(
            id,
            Operation {
                id,
                actions,
                predecessor,
                salt,
                scheduled_at: now,
                ready_at,
                executed_at: None,
            },
        );
        Ok(id)
    }

    /// Execute a ready operation, dispatching its actions atomically with the
    /// gate as caller. The operation is identified by recomputing its hash.
    pub fn execute_batch<D: Dispatcher + ?Sized>(
        &mut self,
        caller: &Address,
        actions: &[Action],
        predecessor: &OperationId,
        salt: &[u8; 32],
        now: LedgerPoint,
        dispatcher: &mut D,
    ) -> Result<OperationId, TimelockError> {
        self.check_role(Role::Executor, caller)?;
        let id = hash_operation_batch(actions, predecessor, salt);
        let operation = self
            .operations
            .get(&id)
            .ok_or(TimelockError::NotScheduled(id))?;
        match operation.state(now.position) {
            OperationState::Done => return Err(TimelockError::AlreadyExecuted(id)),
            OperationState::Waiting => {
                return Err(TimelockError::NotReady {
                    ready_at: operation.ready_at,
                    now: now.position,
                })
            }
            OperationState::Ready | OperationState::Unset => {}
        }
        if !predecessor.is_zero() && !self.is_operation_done(predecessor) {
            return Err(TimelockError::PredecessorNotExecuted(*predecessor));
        }

        let (outward, changes) = self.stage_self_calls(actions)?;
        dispatcher.dispatch_batch(&self.address, &outward, now)?;

        self.roles = changes.roles;
        self.min_delay = changes.min_delay;
        for cancelled in &changes.cancels {
            self.operations.remove(cancelled);
        }
        for call in &changes.applied {
            tracing::info!(operation = %id, call = ?call, "timelock call applied");
        }
        if let Some(op) = self.operations.get_mut(&id) {
            op.executed_at = Some(now);
        }
        tracing::info!(operation = %id, executor = %caller, "operation executed");
        Ok(id)
    }

    /// Split a batch into the calls on this gate, applied to a staged copy of
    /// its state, and the actions handed to the dispatcher. Each self call is
    /// replaced by a transfer to the gate so dispatch indices line up.
    fn stage_self_calls(
        &self,
        actions: &[Action],
    ) -> Result<(Vec<Action>, SelfChanges), TimelockError> {
        let mut changes = SelfChanges {
            roles: self.roles.clone(),
            min_delay: self.min_delay,
            cancels: Vec::new(),
            applied: Vec::new(),
        };
        let mut outward = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            if action.target != self.address || action.calldata.is_empty() {
                outward.push(action.clone());
                continue;
            }
            let call = decode_calldata::<TimelockCall>(&action.calldata).map_err(|e| {
                TimelockError::Calldata {
                    index,
                    reason: e.to_string(),
                }
            })?;
            self.apply_self_call(&mut changes, call)
                .map_err(|source| TimelockError::SelfCall {
                    index,
                    source: Box::new(source),
                })?;
            outward.push(Action::transfer(self.address.clone(), action.value));
        }
        Ok((outward, changes))
    }

    fn apply_self_call(
        &self,
        changes: &mut SelfChanges,
        call: TimelockCall,
    ) -> Result<(), TimelockError> {
        if !changes.roles.has_role(Role::Admin, &self.address) {
            return Err(TimelockError::Unauthorized {
                account: self.address.clone(),
                role: Role::Admin,
            });
        }
        match &call {
            TimelockCall::GrantRole { role, account } => {
                changes.roles.grant(*role, account);
            }
            TimelockCall::RevokeRole { role, account } => {
                changes.roles.revoke(*role, account);
            }
            TimelockCall::Cancel { id } => {
                match self.operations.get(id) {
                    None => return Err(TimelockError::NotScheduled(*id)),
                    Some(op) if op.is_executed() => return Err(TimelockError::AlreadyExecuted(*id)),
                    Some(_) if changes.cancels.contains(id) => {
                        return Err(TimelockError::NotScheduled(*id))
                    }
                    Some(_) => changes.cancels.push(*id),
                }
            }
            TimelockCall::UpdateDelay { min_delay } => changes.min_delay = *min_delay,
        }
        changes.applied.push(call);
        Ok(())
    }

    /// Emergency override: drop a scheduled, unexecuted operation.
    pub fn cancel(&mut self, caller: &Address, id: &OperationId) -> Result<Operation, TimelockError> {
        self.check_role(Role::Admin, caller)?;
        match self.operations.get(id) {
            None => return Err(TimelockError::NotScheduled(*id)),
            Some(op) if op.is_executed() => return Err(TimelockError::AlreadyExecuted(*id)),
            Some(_) => {}
        }
        let removed = self
            .operations
            .remove(id)
            .ok_or(TimelockError::NotScheduled(*id))?;
        tracing::warn!(operation = %id, sender = %caller, "operation cancelled");
        Ok(removed)
    }

    /// Serialize the gate for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, TimelockError> {
        bincode::serialize(self).map_err(|e| TimelockError::Serialization(e.to_string()))
    }

    /// Restore a gate saved with [`Timelock::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, TimelockError> {
        bincode::deserialize(data).map_err(|e| TimelockError::Serialization(e.to_string()))
    }

    fn check_role(&self, role: Role, account: &Address) -> Result<(), TimelockError> {
        if self.roles.has_role(role, account) {
            return Ok(());
        }
        tracing::warn!(%role, %account, "unauthorized timelock call");
        Err(TimelockError::Unauthorized {
            account: account.clone(),
            role,
        })
    }
}
