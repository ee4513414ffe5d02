use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("config error: {0}")]
    Config(String),

    #[error("token error: {0}")]
    Votes(#[from] zar_votes::VotesError),

    #[error("timelock error: {0}")]
    Timelock(#[from] zar_timelock::TimelockError),

    #[error("governance error: {0}")]
    Governance(#[from] zar_governance::GovernanceError),

    #[error("ledger error: {0}")]
    Ledger(#[from] zar_ledger::LedgerError),

    #[error("call failed: {0}")]
    Dispatch(#[from] zar_ledger::DispatchError),
}
