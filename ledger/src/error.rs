use thiserror::Error;
use zar_types::{Address, Position};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient native balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("native balance overflow for {0}")]
    Overflow(Address),

    #[error("a contract is already deployed at {0}")]
    AddressInUse(Address),

    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    #[error("ledger cannot move backwards from {current} to {requested}")]
    PositionRegression { current: Position, requested: Position },
}

/// Failure reported by a contract while handling a call.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("malformed calldata: {0}")]
    Calldata(String),

    #[error("call reverted: {0}")]
    Reverted(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ContractError {
    /// Wrap a contract's own error type as a revert.
    pub fn revert(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Reverted(Box::new(err))
    }

    /// The contract-specific error behind a revert, if it is of type `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Reverted(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Failure of a batch dispatch. Nothing from the batch was committed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("action {index} could not move value to {target}: {source}")]
    Value {
        index: usize,
        target: Address,
        #[source]
        source: LedgerError,
    },

    #[error("action {index} carries calldata but {target} is not a contract")]
    NotAContract { index: usize, target: Address },

    #[error("action {index} on {target} failed: {source}")]
    Call {
        index: usize,
        target: Address,
        #[source]
        source: ContractError,
    },
}

impl DispatchError {
    /// The contract error behind a failed call, if any.
    pub fn contract_error(&self) -> Option<&ContractError> {
        match self {
            Self::Call { source, .. } => Some(source),
            _ => None,
        }
    }
}
