//! Native currency table.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use zar_types::Address;

/// Balances of the ledger's native currency, keyed by address.
///
/// Treasury funds live here; contracts only hold them by address.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeBalances {
    balances: HashMap<Address, u128>,
}

impl NativeBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Create `amount` out of thin air (genesis allocation).
    pub fn credit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(account.clone()))?;
        self.balances.insert(account.clone(), updated);
        Ok(())
    }

    /// Move `amount` from `from` to `to`. A zero amount always succeeds.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 || from == to {
            return self.require(from, amount);
        }
        self.require(from, amount)?;
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(to.clone()))?;
        let from_balance = self.balance_of(from) - amount;
        self.balances.insert(from.clone(), from_balance);
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    fn require(&self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                needed: amount,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(name: &str) -> Address {
        Address::new(format!("zar_{name}"))
    }

    #[test]
    fn unknown_account_is_zero() {
        assert_eq!(NativeBalances::new().balance_of(&addr("nobody")), 0);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut b = NativeBalances::new();
        b.credit(&addr("a"), 100).unwrap();
        b.transfer(&addr("a"), &addr("b"), 40).unwrap();
        assert_eq!(b.balance_of(&addr("a")), 60);
        assert_eq!(b.balance_of(&addr("b")), 40);
    }

    #[test]
    fn transfer_rejects_overdraft_without_mutation() {
        let mut b = NativeBalances::new();
        b.credit(&addr("a"), 10).unwrap();
        let err = b.transfer(&addr("a"), &addr("b"), 11).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { needed: 11, available: 10, .. }));
        assert_eq!(b.balance_of(&addr("a")), 10);
        assert_eq!(b.balance_of(&addr("b")), 0);
    }

    #[test]
    fn credit_overflow_is_reported() {
        let mut b = NativeBalances::new();
        b.credit(&addr("a"), u128::MAX).unwrap();
        assert!(matches!(b.credit(&addr("a"), 1), Err(LedgerError::Overflow(_))));
    }
}
