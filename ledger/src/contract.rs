//! The contract interface consumed by the registry.

use crate::balances::NativeBalances;
use crate::error::ContractError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use zar_types::{Address, LedgerPoint};

/// Everything a contract may observe or touch during one call.
pub struct CallContext<'a> {
    /// Identity that invoked the contract.
    pub caller: &'a Address,
    /// The contract's own address.
    pub this: &'a Address,
    /// Native value already moved from `caller` to `this` for this call.
    pub value: u128,
    pub now: LedgerPoint,
    /// Staged native balances; committed only if the whole batch succeeds.
    pub balances: &'a mut NativeBalances,
}

/// A deployed contract.
///
/// Contracts are cloned into a staging area before a batch runs, so a call may
/// mutate `self` freely: a failed batch simply discards the clone.
pub trait Contract: Send {
    fn call(&mut self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<(), ContractError>;

    fn clone_box(&self) -> Box<dyn Contract>;

    fn as_any(&self) -> &dyn Any;
}

/// Encode a contract call enum as calldata.
///
/// # Panics
///
/// Panics if `T`'s `Serialize` impl reports an error. Derived impls over
/// plain data never do.
pub fn encode_calldata<T: Serialize>(call: &T) -> Vec<u8> {
    bincode::serialize(call).expect("call enums are always serializable with bincode")
}

/// Decode calldata into a contract's call enum.
pub fn decode_calldata<T: DeserializeOwned>(calldata: &[u8]) -> Result<T, ContractError> {
    bincode::deserialize(calldata).map_err(|e| ContractError::Calldata(e.to_string()))
}
