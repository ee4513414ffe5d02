//! Role-based access control.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use zar_types::Address;

/// Capabilities checked at the gate's privileged entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May grant and revoke roles, and cancel pending operations.
    Admin,
    /// May schedule operations.
    Proposer,
    /// May execute ready operations.
    Executor,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Proposer => "PROPOSER",
            Self::Executor => "EXECUTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from role to the set of identities holding it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleTable {
    members: BTreeMap<Role, BTreeSet<Address>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Add `account` to `role`. Returns false if it already held the role.
    pub fn grant(&mut self, role: Role, account: &Address) -> bool {
        self.members.entry(role).or_default().insert(account.clone())
    }

    /// Remove `account` from `role`. Returns false if it did not hold the role.
    pub fn revoke(&mut self, role: Role, account: &Address) -> bool {
        match self.members.get_mut(&role) {
            Some(set) => {
                let removed = set.remove(account);
                if set.is_empty() {
                    self.members.remove(&role);
                }
                removed
            }
            None => false,
        }
    }

    /// All current holders of `role`, in address order.
    pub fn members(&self, role: Role) -> Vec<&Address> {
        self.members
            .get(&role)
            .map(|s| s.iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(name: &str) -> Address {
        Address::new(format!("zar_{name}"))
    }

    #[test]
    fn grant_and_revoke() {
        let mut table = RoleTable::new();
        assert!(table.grant(Role::Proposer, &addr("gov")));
        assert!(!table.grant(Role::Proposer, &addr("gov")));
        assert!(table.has_role(Role::Proposer, &addr("gov")));
        assert!(!table.has_role(Role::Executor, &addr("gov")));

        assert!(table.revoke(Role::Proposer, &addr("gov")));
        assert!(!table.revoke(Role::Proposer, &addr("gov")));
        assert!(!table.has_role(Role::Proposer, &addr("gov")));
    }

    #[test]
    fn members_are_sorted() {
        let mut table = RoleTable::new();
        table.grant(Role::Executor, &addr("b"));
        table.grant(Role::Executor, &addr("a"));
        assert_eq!(table.members(Role::Executor), vec![&addr("a"), &addr("b")]);
        assert!(table.members(Role::Admin).is_empty());
    }
}
