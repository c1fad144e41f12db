//! Test utilities for deployment runs.

mod chain;

pub use chain::*;

use alloy_primitives::Bytes;

use crate::{ContractNames, InMemoryArtifacts};

/// Address of the well-known first development account (`anvil` / `hardhat node`).
pub const DEV_ACCOUNT: alloy_primitives::Address =
    alloy_primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Artifacts for the GeneDAO suite with placeholder bytecode.
pub fn genedao_artifacts() -> InMemoryArtifacts {
    let names = ContractNames::default();
    InMemoryArtifacts::new()
        .with_artifact(names.nft, Bytes::from_static(&[0x60, 0x80, 0x60, 0x01]))
        .with_artifact(names.pcsp, Bytes::from_static(&[0x60, 0x80, 0x60, 0x02]))
        .with_artifact(names.controller, Bytes::from_static(&[0x60, 0x80, 0x60, 0x03]))
}
