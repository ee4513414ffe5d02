//! Content-derived 32-byte identifiers.
//!
//! Proposals and scheduled operations are identified by the Blake2b-256 digest of
//! their contents, so two parties that agree on the actions agree on the id.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Parse a 64-character lowercase or uppercase hex string.
            pub fn from_hex(s: &str) -> Result<Self, TypesError> {
                hex::decode32(s)
                    .map(Self)
                    .ok_or_else(|| TypesError::InvalidDigest(s.to_string()))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(&self.0))
            }
        }
    };
}

digest_type! {
    /// Identity of a governance proposal: hash of its actions and description hash.
    ProposalId
}

digest_type! {
    /// Identity of a timelock operation: hash of its actions, predecessor and salt.
    OperationId
}

digest_type! {
    /// Blake2b-256 of a proposal's UTF-8 description.
    DescriptionHash
}

// Inline hex helpers to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn decode32(s: &str) -> Option<[u8; 32]> {
        if s.len() != 64 || !s.is_ascii() {
            return None;
        }
        let mut out = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            out[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(out)
    }
}
