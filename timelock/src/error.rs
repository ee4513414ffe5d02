use thiserror::Error;
use zar_ledger::DispatchError;
use zar_types::{Address, OperationId, Position};

use crate::roles::Role;

#[derive(Debug, Error)]
pub enum TimelockError {
    #[error("{account} is missing role {role}")]
    Unauthorized { account: Address, role: Role },

    #[error("delay {requested} is below the minimum delay {minimum}")]
    DelayTooShort { requested: u64, minimum: u64 },

    #[error("operation {0} is already scheduled")]
    AlreadyScheduled(OperationId),

    #[error("operation {0} is not scheduled")]
    NotScheduled(OperationId),

    #[error("operation is not ready until {ready_at} (now {now})")]
    NotReady { ready_at: Position, now: Position },

    #[error("operation {0} has already been executed")]
    AlreadyExecuted(OperationId),

    #[error("predecessor operation {0} has not been executed")]
    PredecessorNotExecuted(OperationId),

    #[error("malformed timelock call in action {index}: {reason}")]
    Calldata { index: usize, reason: String },

    #[error("timelock call in action {index} failed: {source}")]
    SelfCall {
        index: usize,
        #[source]
        source: Box<TimelockError>,
    },

    #[error("execution failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
