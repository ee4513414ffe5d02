//! Ledger positions.
//!
//! A `Position` is the block-height analogue of the ledger: a counter that only
//! moves forward. Several operations may be applied at the same position, so
//! every write is additionally stamped with a ledger-wide sequence number. The
//! pair is a [`LedgerPoint`], which totally orders all writes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the ledger's total order of applied blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position(u64);

impl Position {
    /// The genesis position.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn height(&self) -> u64 {
        self.0
    }

    /// This position moved forward by `blocks`, saturating at `u64::MAX`.
    pub fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// This position moved back by `blocks`, saturating at genesis.
    pub fn saturating_sub(self, blocks: u64) -> Self {
        Self(self.0.saturating_sub(blocks))
    }

    /// Blocks elapsed from `self` up to `now` (zero if `now` is earlier).
    pub fn elapsed_since(&self, now: Position) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A position plus the ledger-wide sequence number of the write.
///
/// Ordering is lexicographic: position first, then sequence. Sequence numbers
/// never repeat, so two distinct writes never compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerPoint {
    pub position: Position,
    pub seq: u64,
}

impl LedgerPoint {
    pub fn new(position: Position, seq: u64) -> Self {
        Self { position, seq }
    }
}

impl fmt::Display for LedgerPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.position, self.seq)
    }
}
