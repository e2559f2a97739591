/// Per-window brightness overrides
pub mod attributes;
pub mod interface;
pub mod mock;

pub use interface::*;
