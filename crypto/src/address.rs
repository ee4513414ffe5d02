//! Contract address derivation.
//!
//! Address format: `zar_` + hex(first 20 bytes of Blake2b-256("zar/contract" ‖ deployer ‖ u64le(nonce))).

use crate::hash::blake2b_256_multi;
use zar_types::Address;

const CONTRACT_DOMAIN: &[u8] = b"zar/contract";
/// Number of digest bytes kept in a derived address.
const ADDRESS_BYTES: usize = 20;

/// Derive the address of the `nonce`-th contract deployed by `deployer`.
pub fn derive_contract_address(deployer: &Address, nonce: u64) -> Address {
    let digest = blake2b_256_multi(&[CONTRACT_DOMAIN, deployer.as_bytes(), &nonce.to_le_bytes()]);
    Address::new(format!(
        "{}{}",
        Address::PREFIX,
        hex::encode(&digest[..ADDRESS_BYTES])
    ))
}
