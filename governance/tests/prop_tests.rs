use proptest::prelude::*;

use zar_governance::{
    Governor, GovernorSettings, ProposalState, QuorumPolicy, VoteType, QUORUM_DENOMINATOR,
};
use zar_timelock::Timelock;
use zar_types::{Action, Address, LedgerPoint, Position};
use zar_votes::{TokenMetadata, VoteWeightLedger};

fn account(i: usize) -> Address {
    Address::new(format!("zar_holder{i}"))
}

fn arb_ballot() -> impl Strategy<Value = Option<VoteType>> {
    prop_oneof![
        Just(None),
        Just(Some(VoteType::Against)),
        Just(Some(VoteType::For)),
        Just(Some(VoteType::Abstain)),
    ]
}

fn arb_policy() -> impl Strategy<Value = QuorumPolicy> {
    prop_oneof![
        Just(QuorumPolicy::AllParticipating),
        Just(QuorumPolicy::ForAndAbstain),
    ]
}

proptest! {
    /// Once voting closes the outcome is exactly the quorum-and-majority rule.
    #[test]
    fn closed_vote_outcome_matches_rule(
        holdings in prop::collection::vec(1u128..500, 5),
        ballots in prop::collection::vec(arb_ballot(), 5),
        idle in 0u128..1000,
        quorum_numerator in 0u128..=100,
        quorum_policy in arb_policy(),
    ) {
        let mut seq = 0u64;
        let mut point = |position: u64| {
            seq += 1;
            LedgerPoint::new(Position::new(position), seq)
        };

        let mut token = VoteWeightLedger::new(TokenMetadata {
            name: "Zar Token".into(),
            symbol: "ZRT".into(),
            decimals: 18,
        });
        for (i, amount) in holdings.iter().enumerate() {
            token.mint(&account(i), *amount, point(1)).unwrap();
            token.delegate(&account(i), &account(i), point(1)).unwrap();
        }
        if idle > 0 {
            token.mint(&account(99), idle, point(1)).unwrap();
        }

        let gov = Address::new("zar_governor");
        let timelock = Timelock::new(
            Address::new("zar_timelock"),
            1,
            std::slice::from_ref(&gov),
            std::slice::from_ref(&gov),
            None,
        );
        let mut governor = Governor::new(
            "Zar DAO",
            gov,
            GovernorSettings {
                quorum_numerator,
                quorum_policy,
                ..Default::default()
            },
        )
        .unwrap();

        let actions = vec![Action::transfer(Address::new("zar_payee"), 1)];
        let id = governor
            .propose(&account(0), actions, "property", &token, point(2))
            .unwrap();

        let (mut against, mut for_votes, mut abstain) = (0u128, 0u128, 0u128);
        for (i, ballot) in ballots.iter().enumerate() {
            if let Some(support) = ballot {
                governor
                    .cast_vote(&account(i), &id, *support, &token, &timelock, point(2))
                    .unwrap();
                match support {
                    VoteType::Against => against += holdings[i],
                    VoteType::For => for_votes += holdings[i],
                    VoteType::Abstain => abstain += holdings[i],
                }
            }
        }

        let end = governor.proposal_deadline(&id).unwrap();
        let state = governor.state(&id, &token, &timelock, point(end.height())).unwrap();

        let supply: u128 = holdings.iter().sum::<u128>() + idle;
        let quorum = supply * quorum_numerator / QUORUM_DENOMINATOR;
        let participation = match quorum_policy {
            QuorumPolicy::AllParticipating => for_votes + against + abstain,
            QuorumPolicy::ForAndAbstain => for_votes + abstain,
        };
        let expected = if participation >= quorum && for_votes > against {
            ProposalState::Succeeded
        } else {
            ProposalState::Defeated
        };
        prop_assert_eq!(state, expected);
    }
}
