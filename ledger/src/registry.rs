//! Contract registry and all-or-nothing batch dispatch.

use crate::balances::NativeBalances;
use crate::contract::{CallContext, Contract};
use crate::error::{DispatchError, LedgerError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use zar_crypto::derive_contract_address;
use zar_types::{Action, Address, LedgerPoint};

/// Performs a list of actions on behalf of `caller`.
///
/// Implementations must be atomic: either every action takes effect or none does.
pub trait Dispatcher {
    fn dispatch_batch(
        &mut self,
        caller: &Address,
        actions: &[Action],
        now: LedgerPoint,
    ) -> Result<(), DispatchError>;
}

/// Deployed contracts plus the native currency table they operate on.
#[derive(Default)]
pub struct ContractRegistry {
    contracts: HashMap<Address, Box<dyn Contract>>,
    balances: NativeBalances,
    deploy_nonces: HashMap<Address, u64>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy `contract` at an address derived from `deployer`, moving
    /// `funding` native units from the deployer to the new contract.
    pub fn deploy(
        &mut self,
        deployer: &Address,
        contract: Box<dyn Contract>,
        funding: u128,
    ) -> Result<Address, LedgerError> {
        let address = self.next_address(deployer);
        self.deploy_at(deployer, address.clone(), contract, funding)?;
        Ok(address)
    }

    /// The address the next contract deployed by `deployer` will receive.
    pub fn next_address(&self, deployer: &Address) -> Address {
        let nonce = self.deploy_nonces.get(deployer).copied().unwrap_or(0);
        derive_contract_address(deployer, nonce)
    }

    fn deploy_at(
        &mut self,
        deployer: &Address,
        address: Address,
        contract: Box<dyn Contract>,
        funding: u128,
    ) -> Result<(), LedgerError> {
        if self.contracts.contains_key(&address) {
            return Err(LedgerError::AddressInUse(address));
        }
        self.balances.transfer(deployer, &address, funding)?;
        *self.deploy_nonces.entry(deployer.clone()).or_insert(0) += 1;
        tracing::debug!(%deployer, %address, funding, "contract deployed");
        self.contracts.insert(address, contract);
        Ok(())
    }

    /// Reserve the next derived address of `deployer` for a component that
    /// lives outside the registry (it holds an identity but no contract code).
    pub fn reserve_address(&mut self, deployer: &Address) -> Address {
        let address = self.next_address(deployer);
        *self.deploy_nonces.entry(deployer.clone()).or_insert(0) += 1;
        address
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Typed read access to a deployed contract.
    pub fn contract<T: 'static>(&self, address: &Address) -> Result<&T, LedgerError> {
        self.contracts
            .get(address)
            .and_then(|c| c.as_any().downcast_ref::<T>())
            .ok_or_else(|| LedgerError::UnknownContract(address.clone()))
    }

    pub fn balances(&self) -> &NativeBalances {
        &self.balances
    }

    pub fn balances_mut(&mut self) -> &mut NativeBalances {
        &mut self.balances
    }

    /// Dispatch a single action.
    pub fn call(
        &mut self,
        caller: &Address,
        action: &Action,
        now: LedgerPoint,
    ) -> Result<(), DispatchError> {
        self.dispatch_batch(caller, std::slice::from_ref(action), now)
    }
}

impl Dispatcher for ContractRegistry {
    fn dispatch_batch(
        &mut self,
        caller: &Address,
        actions: &[Action],
        now: LedgerPoint,
    ) -> Result<(), DispatchError> {
        let mut staged_balances = self.balances.clone();
        let mut staged: HashMap<Address, Box<dyn Contract>> = HashMap::new();

        for (index, action) in actions.iter().enumerate() {
            let target = &action.target;
            staged_balances
                .transfer(caller, target, action.value)
                .map_err(|source| DispatchError::Value {
                    index,
                    target: target.clone(),
                    source,
                })?;

            let contract = match staged.entry(target.clone()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => match self.contracts.get(target) {
                    Some(live) => e.insert(live.clone_box()),
                    None if action.calldata.is_empty() => continue,
                    None => {
                        return Err(DispatchError::NotAContract {
                            index,
                            target: target.clone(),
                        })
                    }
                },
            };

            let mut ctx = CallContext {
                caller,
                this: target,
                value: action.value,
                now,
                balances: &mut staged_balances,
            };
            contract
                .call(&mut ctx, &action.calldata)
                .map_err(|source| DispatchError::Call {
                    index,
                    target: target.clone(),
                    source,
                })?;
        }

        self.balances = staged_balances;
        for (address, contract) in staged {
            self.contracts.insert(address, contract);
        }
        Ok(())
    }
}
