use proptest::prelude::*;

use zar_crypto::{hash_description, hash_operation_batch, hash_proposal};
use zar_types::{Action, Address, OperationId};

fn arb_action() -> impl Strategy<Value = Action> {
    ("[a-z]{1,8}", any::<u128>(), prop::collection::vec(any::<u8>(), 0..16)).prop_map(
        |(name, value, calldata)| Action::new(Address::new(format!("zar_{name}")), value, calldata),
    )
}

proptest! {
    /// Recomputing a proposal id from the same contents yields the same id.
    #[test]
    fn proposal_id_is_stable(
        actions in prop::collection::vec(arb_action(), 1..4),
        description in ".{0,32}",
    ) {
        let desc = hash_description(&description);
        prop_assert_eq!(hash_proposal(&actions, &desc), hash_proposal(&actions.clone(), &desc));
    }

    /// Appending an action always changes the proposal id.
    #[test]
    fn extra_action_changes_id(
        actions in prop::collection::vec(arb_action(), 1..4),
        extra in arb_action(),
    ) {
        let desc = hash_description("extra");
        let mut longer = actions.clone();
        longer.push(extra);
        prop_assert_ne!(hash_proposal(&actions, &desc), hash_proposal(&longer, &desc));
    }

    /// Changing a value changes the operation id.
    #[test]
    fn value_changes_operation_id(action in arb_action(), delta in 1u128..1000) {
        let mut bumped = action.clone();
        bumped.value = action.value.wrapping_add(delta);
        let salt = [0u8; 32];
        prop_assert_ne!(
            hash_operation_batch(&[action], &OperationId::ZERO, &salt),
            hash_operation_batch(&[bumped], &OperationId::ZERO, &salt)
        );
    }
}
