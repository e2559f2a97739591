//! The part of the backlight settings Linux has no native home for, kept in
//! a small TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{io::ErrorKind, path::Path};
use tokio::fs;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsState {
    /// Native brightness mode, absent until first written
    pub brightness_mode: Option<i32>,
    /// The write-settings grant, edited by the user
    #[serde(default)]
    pub write_settings: bool,
}

impl SettingsState {
    /// Reads the state, a missing file being an empty state
    pub async fn load(path: &Path) -> Result<SettingsState> {
        match fs::read_to_string(path).await {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Malformed settings state in {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SettingsState::default()),
            Err(e) => Err(e).with_context(|| format!("Couldn't read {}", path.display())),
        }
    }

    pub async fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Couldn't create {}", parent.display()))?;
        }
        let contents = toml::to_string(self)?;
        fs::write(path, contents)
            .await
            .with_context(|| format!("Couldn't write {}", path.display()))
    }
}
