//! ABI helpers for the handful of contract methods the orchestrator touches.

use alloy_primitives::{keccak256, Address, Bytes, Selector, B256};
use alloy_sol_types::{sol, SolCall};

use crate::ChainError;

sol! {
    /// The `Ownable` surface shared by the NFT and token contracts.
    interface IOwnable {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }
}

/// Calldata for `transferOwnership(new_owner)`.
pub fn transfer_ownership_calldata(new_owner: Address) -> Bytes {
    IOwnable::transferOwnershipCall { newOwner: new_owner }.abi_encode().into()
}

/// Calldata for `owner()`.
pub fn owner_calldata() -> Bytes {
    IOwnable::ownerCall {}.abi_encode().into()
}

/// Selector of a function given its canonical signature, e.g. `geneNFT()`.
pub fn selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes()).as_slice()[..4])
}

/// Encodes a list of addresses as static constructor parameters.
pub fn encode_address_params(addresses: &[Address]) -> Bytes {
    addresses.iter().flat_map(|address| address.into_word().0).collect::<Vec<u8>>().into()
}

/// Decodes a single `address` return value.
pub fn decode_address(data: &[u8]) -> Result<Address, ChainError> {
    if data.len() < 32 {
        return Err(ChainError::MalformedResponse(format!(
            "expected a 32-byte address word, got {} bytes",
            data.len()
        )));
    }
    let word = B256::from_slice(&data[..32]);
    if word.as_slice()[..12].iter().any(|byte| *byte != 0) {
        return Err(ChainError::MalformedResponse(format!("{word} is not an address word")));
    }
    Ok(Address::from_word(word))
}
