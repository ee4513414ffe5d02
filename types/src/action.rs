//! The unit of work carried by proposals and timelock operations.

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// One call to be performed on execution: send `value` native units to `target`
/// and invoke it with `calldata`.
///
/// Empty calldata against an account that is not a contract is a plain transfer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    pub value: u128,
    pub calldata: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, value: u128, calldata: Vec<u8>) -> Self {
        Self {
            target,
            value,
            calldata,
        }
    }

    /// A plain value transfer with no calldata.
    pub fn transfer(target: Address, value: u128) -> Self {
        Self::new(target, value, Vec::new())
    }
}
