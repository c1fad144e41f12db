//! Deployment plans: ordered steps with declared dependencies.

use std::{collections::HashSet, fmt};

use crate::{DeployError, Result};

/// Label of the NFT contract in [`DeploymentPlan::genedao`].
pub const NFT_LABEL: &str = "nft";
/// Label of the domain token contract in [`DeploymentPlan::genedao`].
pub const PCSP_LABEL: &str = "pcsp";
/// Label of the controller contract in [`DeploymentPlan::genedao`].
pub const CONTROLLER_LABEL: &str = "controller";

/// Contract names of the GeneDAO suite, as they appear in the compiled artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractNames {
    /// The non-fungible-token contract
    pub nft: String,
    /// The domain token contract
    pub pcsp: String,
    /// The controller contract
    pub controller: String,
}

impl Default for ContractNames {
    fn default() -> Self {
        Self {
            nft: "GeneNFT".into(),
            pcsp: "PostCovidStrokePrevention".into(),
            controller: "Controller".into(),
        }
    }
}

/// One step of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create a contract. `args` are labels of earlier deploy steps whose addresses become the
    /// constructor arguments, in order.
    Deploy {
        /// Label under which the address is recorded
        label: String,
        /// Artifact name of the contract
        contract: String,
        /// Constructor arguments, by label
        args: Vec<String>,
    },
    /// Call `transferOwnership` on `target`, naming `new_owner`'s address.
    TransferOwnership {
        /// Label of the contract whose owner changes
        target: String,
        /// Label of the contract that becomes owner
        new_owner: String,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deploy { label, contract, .. } => write!(f, "deploy {label} ({contract})"),
            Self::TransferOwnership { target, new_owner } => {
                write!(f, "transfer ownership of {target} to {new_owner}")
            }
        }
    }
}

/// A post-deployment check against on-chain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// `owner()` of `target` returns the address of `expected`.
    Owner {
        /// Label of the queried contract
        target: String,
        /// Label of the expected owner
        expected: String,
    },
    /// The zero-argument address getter `signature` of `target` returns the address of
    /// `expected`.
    AddressGetter {
        /// Label of the queried contract
        target: String,
        /// Canonical getter signature, e.g. `geneNFT()`
        signature: String,
        /// Label of the expected address
        expected: String,
    },
}

/// A validated, ordered deployment.
///
/// Every label a step references belongs to a deploy step that comes before it, so executing
/// the steps in order always has the addresses it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    steps: Vec<Step>,
    expectations: Vec<Expectation>,
}

impl DeploymentPlan {
    /// Starts an empty plan.
    pub fn builder() -> DeploymentPlanBuilder {
        DeploymentPlanBuilder::default()
    }

    /// The GeneDAO suite: NFT, then token, then a controller constructed with both, then
    /// ownership of NFT and token handed to the controller.
    pub fn genedao(names: &ContractNames) -> Result<Self> {
        Self::builder()
            .deploy(NFT_LABEL, &names.nft, &[])
            .deploy(PCSP_LABEL, &names.pcsp, &[])
            .deploy(CONTROLLER_LABEL, &names.controller, &[NFT_LABEL, PCSP_LABEL])
            .transfer_ownership(NFT_LABEL, CONTROLLER_LABEL)
            .transfer_ownership(PCSP_LABEL, CONTROLLER_LABEL)
            .expect_getter(CONTROLLER_LABEL, "geneNFT()", NFT_LABEL)
            .expect_getter(CONTROLLER_LABEL, "pcspToken()", PCSP_LABEL)
            .build()
    }

    /// The steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Contract names of all deploy steps, in order.
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            Step::Deploy { contract, .. } => Some(contract.as_str()),
            Step::TransferOwnership { .. } => None,
        })
    }

    /// Checks to run after all steps succeed: one owner check per ownership transfer, followed
    /// by the explicitly declared expectations.
    pub fn expectations(&self) -> Vec<Expectation> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::TransferOwnership { target, new_owner } => Some(Expectation::Owner {
                    target: target.clone(),
                    expected: new_owner.clone(),
                }),
                Step::Deploy { .. } => None,
            })
            .chain(self.expectations.iter().cloned())
            .collect()
    }
}

/// Builder for [`DeploymentPlan`]. Validation happens in [`DeploymentPlanBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct DeploymentPlanBuilder {
    steps: Vec<Step>,
    expectations: Vec<Expectation>,
}

impl DeploymentPlanBuilder {
    /// Appends a contract creation.
    pub fn deploy(mut self, label: &str, contract: &str, args: &[&str]) -> Self {
        self.steps.push(Step::Deploy {
            label: label.into(),
            contract: contract.into(),
            args: args.iter().map(|arg| (*arg).into()).collect(),
        });
        self
    }

    /// Appends an ownership transfer.
    pub fn transfer_ownership(mut self, target: &str, new_owner: &str) -> Self {
        self.steps.push(Step::TransferOwnership { target: target.into(), new_owner: new_owner.into() });
        self
    }

    /// Declares that `target.signature()` must return the address of `expected`.
    pub fn expect_getter(mut self, target: &str, signature: &str, expected: &str) -> Self {
        self.expectations.push(Expectation::AddressGetter {
            target: target.into(),
            signature: signature.into(),
            expected: expected.into(),
        });
        self
    }

    /// Validates ordering and references.
    pub fn build(self) -> Result<DeploymentPlan> {
        let invalid = |msg: String| Err(DeployError::InvalidPlan(msg));

        if self.steps.is_empty() {
            return invalid("plan has no steps".into());
        }

        let mut deployed = HashSet::new();
        let mut transferred = HashSet::new();
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Deploy { label, contract, args } => {
                    if label.is_empty() || contract.is_empty() {
                        return invalid(format!("step {index} has an empty label or contract name"));
                    }
                    if let Some(arg) = args.iter().find(|arg| !deployed.contains(arg.as_str())) {
                        return invalid(format!("{step} uses `{arg}` before it is deployed"));
                    }
                    if !deployed.insert(label.as_str()) {
                        return invalid(format!("label `{label}` is deployed twice"));
                    }
                }
                Step::TransferOwnership { target, new_owner } => {
                    for label in [target, new_owner] {
                        if !deployed.contains(label.as_str()) {
                            return invalid(format!("{step} uses `{label}` before it is deployed"));
                        }
                    }
                    if target == new_owner {
                        return invalid(format!("{step} would make `{target}` its own owner"));
                    }
                    if !transferred.insert(target.as_str()) {
                        return invalid(format!("ownership of `{target}` is transferred twice"));
                    }
                }
            }
        }

        for expectation in &self.expectations {
            let (target, expected) = match expectation {
                Expectation::Owner { target, expected } |
                Expectation::AddressGetter { target, expected, .. } => (target, expected),
            };
            if let Some(label) =
                [target, expected].into_iter().find(|label| !deployed.contains(label.as_str()))
            {
                return invalid(format!("expectation references unknown label `{label}`"));
            }
        }

        Ok(DeploymentPlan { steps: self.steps, expectations: self.expectations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genedao_plan_order() {
        let plan = DeploymentPlan::genedao(&ContractNames::default()).unwrap();
        let rendered: Vec<String> = plan.steps().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "deploy nft (GeneNFT)",
                "deploy pcsp (PostCovidStrokePrevention)",
                "deploy controller (Controller)",
                "transfer ownership of nft to controller",
                "transfer ownership of pcsp to controller",
            ]
        );
        assert_eq!(
            plan.contracts().collect::<Vec<_>>(),
            ["GeneNFT", "PostCovidStrokePrevention", "Controller"]
        );
        assert!(matches!(
            &plan.steps()[2],
            Step::Deploy { args, .. } if args == &["nft".to_string(), "pcsp".to_string()]
        ));
    }

    #[test]
    fn test_expectations_cover_transfers_then_getters() {
        let plan = DeploymentPlan::genedao(&ContractNames::default()).unwrap();
        let expectations = plan.expectations();
        assert_eq!(expectations.len(), 4);
        assert_eq!(
            expectations[0],
            Expectation::Owner { target: "nft".into(), expected: "controller".into() }
        );
        assert_eq!(
            expectations[3],
            Expectation::AddressGetter {
                target: "controller".into(),
                signature: "pcspToken()".into(),
                expected: "pcsp".into(),
            }
        );
    }

    #[test]
    fn test_rejects_use_before_creation() {
        let err = DeploymentPlan::builder()
            .deploy("controller", "Controller", &["nft"])
            .deploy("nft", "GeneNFT", &[])
            .build()
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidPlan(msg) if msg.contains("`nft` before")));

        let err = DeploymentPlan::builder()
            .deploy("nft", "GeneNFT", &[])
            .transfer_ownership("nft", "controller")
            .deploy("controller", "Controller", &["nft"])
            .build()
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidPlan(_)));
    }

    #[test]
    fn test_rejects_duplicates_and_self_ownership() {
        let duplicate = DeploymentPlan::builder()
            .deploy("nft", "GeneNFT", &[])
            .deploy("nft", "GeneNFT", &[])
            .build();
        assert!(matches!(duplicate, Err(DeployError::InvalidPlan(_))));

        let own_owner = DeploymentPlan::builder()
            .deploy("nft", "GeneNFT", &[])
            .transfer_ownership("nft", "nft")
            .build();
        assert!(matches!(own_owner, Err(DeployError::InvalidPlan(_))));

        let twice = DeploymentPlan::builder()
            .deploy("nft", "GeneNFT", &[])
            .deploy("controller", "Controller", &["nft"])
            .transfer_ownership("nft", "controller")
            .transfer_ownership("nft", "controller")
            .build();
        assert!(matches!(twice, Err(DeployError::InvalidPlan(_))));

        assert!(matches!(DeploymentPlan::builder().build(), Err(DeployError::InvalidPlan(_))));
    }

    #[test]
    fn test_rejects_unknown_expectation_labels() {
        let plan = DeploymentPlan::builder()
            .deploy("nft", "GeneNFT", &[])
            .expect_getter("controller", "geneNFT()", "nft")
            .build();
        assert!(matches!(plan, Err(DeployError::InvalidPlan(msg)) if msg.contains("controller")));
    }
}
