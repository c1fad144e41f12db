use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes};
use tracing::{debug, info};

use crate::{abi, ChainClient, DeployError, Expectation, Result};

/// Checks every expectation against on-chain state, stopping at the first mismatch.
///
/// `addresses` maps plan labels to deployed addresses.
pub async fn verify<C>(
    client: &C,
    expectations: &[Expectation],
    addresses: &BTreeMap<String, Address>,
) -> Result<()>
where
    C: ChainClient + ?Sized,
{
    let resolve = |label: &str| {
        addresses.get(label).copied().ok_or_else(|| DeployError::UnknownLabel(label.into()))
    };

    for expectation in expectations {
        let (target, check, calldata, expected) = match expectation {
            Expectation::Owner { target, expected } => {
                (target, "owner()", abi::owner_calldata(), expected)
            }
            Expectation::AddressGetter { target, signature, expected } => (
                target,
                signature.as_str(),
                Bytes::copy_from_slice(abi::selector(signature).as_slice()),
                expected,
            ),
        };
        let target_address = resolve(target)?;
        let expected_address = resolve(expected)?;

        let step = format!("verify {target}.{check}");
        let output = client
            .call(target_address, calldata)
            .await
            .map_err(|e| DeployError::from_chain(&step, e))?;
        let actual = abi::decode_address(&output).map_err(|e| DeployError::from_chain(&step, e))?;

        debug!(%target, check, %actual, expected = %expected_address, "Verification read");
        if actual != expected_address {
            return Err(DeployError::Verification {
                target: target.clone(),
                check: check.into(),
                actual,
                expected: expected_address,
            });
        }
    }

    info!(checks = expectations.len(), "Deployment verified");
    Ok(())
}
