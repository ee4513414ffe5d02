//! Treasury state and calldata handling.

use crate::error::TreasuryError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use zar_ledger::{
    decode_calldata, encode_calldata, CallContext, Contract, ContractError, NativeBalances,
};
use zar_types::Address;

/// Calls accepted by the treasury contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasuryCall {
    Release,
    TransferOwnership { new_owner: Address },
}

impl TreasuryCall {
    pub fn encode(&self) -> Vec<u8> {
        encode_calldata(self)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Treasury {
    owner: Address,
    payee: Address,
    released: bool,
}

impl Treasury {
    /// A treasury owned by `owner` (usually the deployer, until ownership is
    /// handed to the timelock) paying out to `payee`.
    pub fn new(owner: Address, payee: Address) -> Self {
        Self {
            owner,
            payee,
            released: false,
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn payee(&self) -> &Address {
        &self.payee
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Pay the treasury's full native balance to the payee. Returns the amount paid.
    pub fn release(
        &mut self,
        caller: &Address,
        this: &Address,
        balances: &mut NativeBalances,
    ) -> Result<u128, ContractError> {
        self.only_owner(caller)?;
        if self.released {
            return Err(ContractError::revert(TreasuryError::AlreadyReleased));
        }
        let amount = balances.balance_of(this);
        balances.transfer(this, &self.payee, amount)?;
        self.released = true;
        tracing::info!(treasury = %this, payee = %self.payee, amount, "treasury released");
        Ok(amount)
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), TreasuryError> {
        if caller != &self.owner {
            return Err(self.unauthorized(caller));
        }
        tracing::info!(previous = %self.owner, new = %new_owner, "treasury ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    fn only_owner(&self, caller: &Address) -> Result<(), ContractError> {
        if caller != &self.owner {
            tracing::warn!(%caller, owner = %self.owner, "unauthorized treasury call");
            return Err(ContractError::revert(self.unauthorized(caller)));
        }
        Ok(())
    }

    fn unauthorized(&self, caller: &Address) -> TreasuryError {
        TreasuryError::Unauthorized {
            caller: caller.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl Contract for Treasury {
    fn call(&mut self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<(), ContractError> {
        match decode_calldata::<TreasuryCall>(calldata)? {
            TreasuryCall::Release => {
                self.release(ctx.caller, ctx.this, &mut *ctx.balances)?;
            }
            TreasuryCall::TransferOwnership { new_owner } => {
                self.transfer_ownership(ctx.caller, new_owner)
                    .map_err(ContractError::revert)?;
            }
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
