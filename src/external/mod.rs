//! Abstractions over the platform services the bridge delegates to

pub mod dbus;
pub mod dependency_provider;
pub mod system_settings;
pub mod ui_context;
pub mod window;
