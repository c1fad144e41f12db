mod error;
mod logging;
mod network;
mod report;
mod rpc;

pub use error::*;
pub use logging::*;
pub use network::*;
pub use report::*;
pub use rpc::*;
