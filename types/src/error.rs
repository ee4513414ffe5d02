//! Errors raised while constructing shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex digest: {0}")]
    InvalidDigest(String),
}
