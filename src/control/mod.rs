//! Actors hosting the bridge

pub mod bridge_server;
pub mod dbus_controller;

#[cfg(test)]
mod test;
