/// System-wide brightness settings and the permission to write them
pub mod backlight;
pub mod interface;
pub mod mock;
mod state_file;

pub use interface::*;
