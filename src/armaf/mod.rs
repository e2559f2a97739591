//! Actor primitives on top of Tokio tasks, used to give the bridge and the
//! UI-owning context their own single-writer tasks.

mod ports;
mod server;

#[doc(inline)]
pub use ports::*;

#[doc(inline)]
pub use server::*;

#[cfg(test)]
mod test_ports;

#[cfg(test)]
mod test_server;
