//! Blake2b hashing for proposal and operation identities.
//!
//! Layout of the action list shared by both identities:
//!
//! ```text
//! u32le(count)
//! for each action:
//!     u32le(len(target)) ‖ target ‖ u128le(value) ‖ u32le(len(calldata)) ‖ calldata
//! ```
//!
//! A proposal id appends the description hash; an operation id appends the
//! predecessor and the salt. Each identity starts with its own domain tag so a
//! proposal and an operation over the same actions never collide.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use zar_types::{Action, DescriptionHash, OperationId, ProposalId};

type Blake2b256 = Blake2b<U32>;

const PROPOSAL_DOMAIN: &[u8] = b"zar/proposal";
const OPERATION_DOMAIN: &[u8] = b"zar/operation";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Append the canonical encoding of `actions` to `hasher`.
pub fn encode_actions(hasher: &mut impl Digest, actions: &[Action]) {
    hasher.update((actions.len() as u32).to_le_bytes());
    for action in actions {
        let target = action.target.as_bytes();
        hasher.update((target.len() as u32).to_le_bytes());
        hasher.update(target);
        hasher.update(action.value.to_le_bytes());
        hasher.update((action.calldata.len() as u32).to_le_bytes());
        hasher.update(&action.calldata);
    }
}

/// Hash a proposal's human-readable description.
pub fn hash_description(description: &str) -> DescriptionHash {
    DescriptionHash::new(blake2b_256(description.as_bytes()))
}

/// Deterministic proposal id over its actions and description hash.
pub fn hash_proposal(actions: &[Action], description_hash: &DescriptionHash) -> ProposalId {
    let mut hasher = Blake2b256::new();
    hasher.update(PROPOSAL_DOMAIN);
    encode_actions(&mut hasher, actions);
    hasher.update(description_hash.as_bytes());
    ProposalId::new(finish(hasher))
}

/// Deterministic timelock operation id over its actions, predecessor and salt.
pub fn hash_operation_batch(
    actions: &[Action],
    predecessor: &OperationId,
    salt: &[u8; 32],
) -> OperationId {
    let mut hasher = Blake2b256::new();
    hasher.update(OPERATION_DOMAIN);
    encode_actions(&mut hasher, actions);
    hasher.update(predecessor.as_bytes());
    hasher.update(salt);
    OperationId::new(finish(hasher))
}

fn finish(hasher: Blake2b256) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}
