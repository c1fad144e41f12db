//! Deployment orchestration for the GeneDAO contract suite.
//!
//! The crate models a deployment as a [`DeploymentPlan`]: an ordered list of contract creations
//! and ownership transfers whose arguments reference earlier steps by label. The [`Deployer`]
//! executes a plan strictly in order against any [`ChainClient`], aborting on the first failure,
//! and produces a [`DeploymentReport`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod abi;

mod artifact;
pub use artifact::*;

mod client;
pub use client::*;

mod deployer;
pub use deployer::*;

mod error;
pub use error::*;

mod plan;
pub use plan::*;

mod progress;
pub use progress::*;

mod report;
pub use report::*;

mod verify;
pub use verify::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
