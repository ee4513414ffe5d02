//! Scheduled operations.

use serde::{Deserialize, Serialize};
use zar_types::{Action, LedgerPoint, OperationId, Position};

/// Observable lifecycle state of an operation id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    /// Never scheduled, or cancelled.
    Unset,
    /// Scheduled; delay not yet elapsed.
    Waiting,
    /// Scheduled; executable now.
    Ready,
    /// Executed. Terminal.
    Done,
}

/// A batch of actions waiting behind the gate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub actions: Vec<Action>,
    pub predecessor: OperationId,
    pub salt: [u8; 32],
    pub scheduled_at: LedgerPoint,
    /// Earliest position at which execution is permitted.
    pub ready_at: Position,
    pub executed_at: Option<LedgerPoint>,
}

impl Operation {
    pub fn is_executed(&self) -> bool {
        self.executed_at.is_some()
    }

    pub fn state(&self, now: Position) -> OperationState {
        if self.is_executed() {
            OperationState::Done
        } else if now >= self.ready_at {
            OperationState::Ready
        } else {
            OperationState::Waiting
        }
    }
}
