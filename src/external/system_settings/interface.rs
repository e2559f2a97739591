use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Native value of [SettingKey::ScreenBrightnessMode] for manual brightness
pub const SCREEN_BRIGHTNESS_MODE_MANUAL: i32 = 0;
/// Native value of [SettingKey::ScreenBrightnessMode] for automatic brightness
pub const SCREEN_BRIGHTNESS_MODE_AUTOMATIC: i32 = 1;
/// Upper bound of the native [SettingKey::ScreenBrightness] range, which starts at 0
pub const SCREEN_BRIGHTNESS_MAX: i32 = 255;

/// The settings the bridge reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    ScreenBrightness,
    ScreenBrightnessMode,
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingKey::ScreenBrightness => write!(f, "screen_brightness"),
            SettingKey::ScreenBrightnessMode => write!(f, "screen_brightness_mode"),
        }
    }
}

/// Failures of a [SystemSettings] store
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("setting {0} not found")]
    NotFound(SettingKey),

    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

/// The persistent, system-wide settings store.
///
/// Values are stored as native integers. Writing requires the write-settings
/// permission, which the user grants outside of this process; it can only be
/// observed by asking [SystemSettings::can_write] again.
#[async_trait]
pub trait SystemSettings: 'static + Send + Sync + Clone {
    async fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError>;

    async fn put_int(&self, key: SettingKey, value: i32) -> Result<(), SettingsError>;

    /// Is the write-settings permission currently held
    async fn can_write(&self) -> Result<bool>;

    /// Bring up the screen where the user can grant the write-settings
    /// permission. Returns as soon as the screen was launched, the user's
    /// decision is never reported back.
    async fn open_write_settings(&self) -> Result<()>;
}
