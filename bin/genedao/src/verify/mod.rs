//! Verify module for re-checking a recorded deployment against on-chain state

mod cmd;

pub use cmd::*;
