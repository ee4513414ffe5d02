//! Append-only checkpoint series.

use crate::error::VotesError;
use serde::{Deserialize, Serialize};
use zar_types::{LedgerPoint, Position};

/// A value recorded at a ledger point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at: LedgerPoint,
    pub value: u128,
}

/// History of a single quantity (one account's weight, or total supply).
///
/// Entries are strictly increasing in `(position, seq)` and never rewritten.
/// Several entries may share a position; a lookup at that position sees the
/// last of them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckpointSeries {
    entries: Vec<Checkpoint>,
}

impl CheckpointSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `at`. Fails if `at` does not follow the latest entry.
    pub fn push(&mut self, at: LedgerPoint, value: u128) -> Result<(), VotesError> {
        if let Some(last) = self.last() {
            if at <= last.at {
                return Err(VotesError::NonMonotonicCheckpoint {
                    latest: last.at,
                    attempted: at,
                });
            }
        }
        self.entries.push(Checkpoint { at, value });
        Ok(())
    }

    /// Latest recorded value, or zero if nothing was ever recorded.
    pub fn latest(&self) -> u128 {
        self.entries.last().map(|c| c.value).unwrap_or(0)
    }

    /// Value of the last checkpoint whose position is `<= position`.
    ///
    /// Binary search over the series; zero when no such checkpoint exists.
    pub fn value_at(&self, position: Position) -> u128 {
        let idx = self
            .entries
            .partition_point(|c| c.at.position <= position);
        if idx == 0 {
            0
        } else {
            self.entries[idx - 1].value
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Checkpoint> {
        self.entries.last()
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }
}
