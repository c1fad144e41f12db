//! Deploy module for running the full deployment sequence
//!
//! Deploys the NFT and token contracts, then the controller constructed with both addresses,
//! and finally transfers ownership of the NFT and token to the controller.

mod cmd;
mod progress;

pub use cmd::*;
pub use progress::*;
