//! Library half of the `genedao` CLI: argument parsing, configuration and the JSON-RPC chain
//! client.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod cmd;
pub use cmd::*;

/// Shared argument groups, configuration and the RPC client
pub mod common;

/// The `deploy` command
pub mod deploy;

/// The `verify` command
pub mod verify;

/// The `balance` command
pub mod balance;
