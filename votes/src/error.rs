use thiserror::Error;
use zar_types::{Address, LedgerPoint, Position};

#[derive(Debug, Error)]
pub enum VotesError {
    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("lookup at {requested} is not final yet (ledger is at {current})")]
    FutureLookup {
        requested: Position,
        current: Position,
    },

    #[error("arithmetic overflow while updating {0}")]
    Overflow(&'static str),

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("checkpoint at {attempted} does not follow the latest checkpoint at {latest}")]
    NonMonotonicCheckpoint {
        latest: LedgerPoint,
        attempted: LedgerPoint,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}
