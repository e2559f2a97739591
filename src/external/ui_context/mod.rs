/// Execution on the context owning the window
#[cfg(test)]
pub mod inline;
pub mod interface;
pub mod ui_thread;

pub use interface::*;
