//! Account address type with `zar_` prefix.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account identity on the ledger, always prefixed with `zar_`.
///
/// Externally owned accounts and contracts share the same address space.
/// Contract addresses are derived from the deployer (see `zar_crypto::derive_contract_address`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "zar_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use [`Address::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::well_formed(&s), "address must start with zar_");
        Self(s)
    }

    /// Parse an address, rejecting malformed input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if Self::well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes used when the address participates in a content hash.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn well_formed(s: &str) -> bool {
        s.starts_with(Self::PREFIX) && s.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if Self::well_formed(&raw) {
            Ok(Self(raw))
        } else {
            Err(TypesError::InvalidAddress(raw))
        }
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
