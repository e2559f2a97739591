//! The brightness bridge: the public call surface over the window override
//! and the system brightness settings.

pub mod brightness_bridge;
pub mod call;
pub mod error;
pub mod types;

pub use brightness_bridge::BrightnessBridge;
pub use call::{BridgeCall, BridgeResponse};
pub use error::BridgeError;
pub use types::*;

#[cfg(test)]
mod test;
