//! The TOML configuration file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// flexi_logger log filter, overridden by RUST_LOG
    pub log_spec: String,
    pub backlight: BacklightConfig,
    pub dbus: DBusConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    /// Name of the device under /sys/class/backlight
    pub device: String,
    /// Where the brightness mode and the write-settings grant are kept
    pub state_file: PathBuf,
    /// Program used to show the state file when the permission is requested
    pub opener: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DBusConfig {
    pub path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_spec: "info".to_owned(),
            backlight: BacklightConfig::default(),
            dbus: DBusConfig::default(),
        }
    }
}

impl Default for BacklightConfig {
    fn default() -> Self {
        BacklightConfig {
            device: "intel_backlight".to_owned(),
            state_file: default_state_file(),
            opener: "xdg-open".to_owned(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`, or use the defaults without one
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Couldn't read config {}", path.display()))?;
                Config::parse(&contents)
                    .with_context(|| format!("Invalid config {}", path.display()))
            }
            None => Ok(Config::default()),
        }
    }

    pub fn parse(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }
}

fn default_state_file() -> PathBuf {
    let state_home = env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("."));
    state_home.join("brightness-bridge").join("settings.toml")
}
