use proptest::prelude::*;

use zar_types::{Address, LedgerPoint, Position};
use zar_votes::{CheckpointSeries, TokenMetadata, VoteWeightLedger};

fn account(i: usize) -> Address {
    Address::new(format!("zar_holder{i}"))
}

#[derive(Clone, Debug)]
enum Op {
    Transfer { from: usize, to: usize, amount: u128 },
    Delegate { account: usize, target: usize },
    Mine,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0usize..4, 0u128..200).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (0usize..4, 0usize..4).prop_map(|(account, target)| Op::Delegate { account, target }),
        Just(Op::Mine),
    ]
}

proptest! {
    /// value_at always returns the value of the latest checkpoint at or before the position.
    #[test]
    fn value_at_matches_linear_scan(
        steps in prop::collection::vec((0u64..3, any::<u32>()), 1..40),
        query in 0u64..150,
    ) {
        let mut series = CheckpointSeries::new();
        let mut position = 0u64;
        let mut written = Vec::new();
        for (seq, (gap, value)) in steps.into_iter().enumerate() {
            position += gap;
            series.push(LedgerPoint::new(Position::new(position), seq as u64), value as u128).unwrap();
            written.push((position, value as u128));
        }
        let expected = written
            .iter()
            .filter(|(p, _)| *p <= query)
            .last()
            .map(|(_, v)| *v)
            .unwrap_or(0);
        prop_assert_eq!(series.value_at(Position::new(query)), expected);
    }

    /// Each delegate's weight equals the summed balances of its delegators, and
    /// total weight never exceeds supply.
    #[test]
    fn weight_equals_delegated_balances(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut token = VoteWeightLedger::new(TokenMetadata {
            name: "Zar Token".into(),
            symbol: "ZRT".into(),
            decimals: 18,
        });
        let mut position = 1u64;
        let mut seq = 0u64;
        let mut stamp = |position: u64| {
            seq += 1;
            LedgerPoint::new(Position::new(position), seq)
        };
        for i in 0..4 {
            token.mint(&account(i), 250, stamp(position)).unwrap();
        }
        for op in ops {
            match op {
                Op::Transfer { from, to, amount } => {
                    let _ = token.transfer(&account(from), &account(to), amount, stamp(position));
                }
                Op::Delegate { account: a, target } => {
                    token.delegate(&account(a), &account(target), stamp(position)).unwrap();
                }
                Op::Mine => position += 1,
            }
        }
        let mut total_weight = 0u128;
        for d in 0..4 {
            let expected: u128 = (0..4)
                .filter(|&a| token.delegates(&account(a)) == Some(&account(d)))
                .map(|a| token.balance_of(&account(a)))
                .sum();
            prop_assert_eq!(token.get_votes(&account(d)), expected);
            total_weight += expected;
        }
        prop_assert!(total_weight <= token.total_supply());
        prop_assert_eq!(token.total_supply(), 1000);
    }
}
