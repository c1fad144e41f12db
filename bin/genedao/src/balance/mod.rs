//! Balance module for inspecting the deployer account before a deployment

mod cmd;

pub use cmd::*;
