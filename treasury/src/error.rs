use thiserror::Error;
use zar_types::Address;

#[derive(Debug, Error)]
pub enum TreasuryError {
    #[error("{caller} is not the treasury owner ({owner})")]
    Unauthorized { caller: Address, owner: Address },

    #[error("treasury funds were already released")]
    AlreadyReleased,
}
