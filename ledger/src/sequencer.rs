//! Single-writer position sequencer.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use zar_types::{LedgerPoint, Position};

/// Hands out the ledger's total order.
///
/// The position only moves forward via [`Sequencer::mine`] or
/// [`Sequencer::advance_to`]; every stamped operation also consumes a fresh,
/// never-repeating sequence number.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sequencer {
    position: Position,
    next_seq: u64,
}

impl Sequencer {
    pub fn new(genesis: Position) -> Self {
        Self {
            position: genesis,
            next_seq: 0,
        }
    }

    /// The position at which the next operation will be applied.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Read-only view of "now", without consuming a sequence number.
    pub fn peek(&self) -> LedgerPoint {
        LedgerPoint::new(self.position, self.next_seq)
    }

    /// Stamp the next operation.
    pub fn next_point(&mut self) -> LedgerPoint {
        let point = LedgerPoint::new(self.position, self.next_seq);
        self.next_seq += 1;
        point
    }

    /// Close `blocks` positions.
    pub fn mine(&mut self, blocks: u64) {
        self.position = self.position.saturating_add(blocks);
    }

    /// Jump forward to `target`. Moving backwards is rejected.
    pub fn advance_to(&mut self, target: Position) -> Result<(), LedgerError> {
        if target < self.position {
            return Err(LedgerError::PositionRegression {
                current: self.position,
                requested: target,
            });
        }
        self.position = target;
        Ok(())
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(Position::GENESIS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_share_position_but_not_sequence() {
        let mut seq = Sequencer::new(Position::new(5));
        let a = seq.next_point();
        let b = seq.next_point();
        assert_eq!(a.position, b.position);
        assert!(a < b);
    }

    #[test]
    fn sequence_keeps_increasing_across_blocks() {
        let mut seq = Sequencer::default();
        let a = seq.next_point();
        seq.mine(1);
        let b = seq.next_point();
        assert_eq!(b.position, Position::new(1));
        assert!(b.seq > a.seq);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = Sequencer::default();
        let peeked = seq.peek();
        assert_eq!(seq.next_point(), peeked);
    }

    #[test]
    fn advance_to_rejects_regression() {
        let mut seq = Sequencer::new(Position::new(10));
        assert!(seq.advance_to(Position::new(12)).is_ok());
        assert!(matches!(
            seq.advance_to(Position::new(3)),
            Err(LedgerError::PositionRegression { .. })
        ));
        assert_eq!(seq.position(), Position::new(12));
    }
}
