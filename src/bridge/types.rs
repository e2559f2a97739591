use crate::external::system_settings::{
    SCREEN_BRIGHTNESS_MAX, SCREEN_BRIGHTNESS_MODE_AUTOMATIC, SCREEN_BRIGHTNESS_MODE_MANUAL,
};
use serde::Serialize;
use std::fmt;

/// Reported when the window follows the system and the system value can't
/// be found
pub const DEFAULT_BRIGHTNESS: f64 = 0.5;

/// Clamp a caller supplied brightness into 0.0..=1.0
pub fn clamp_brightness(brightness: f64) -> f64 {
    brightness.clamp(0.0, 1.0)
}

/// Convert a native 0..=255 system brightness into 0.0..=1.0
pub fn native_to_normalized(native: i32) -> f64 {
    native as f64 / SCREEN_BRIGHTNESS_MAX as f64
}

/// Convert a 0.0..=1.0 brightness into the native range, rounding halves up
pub fn normalized_to_native(brightness: f64) -> i32 {
    (clamp_brightness(brightness) * SCREEN_BRIGHTNESS_MAX as f64 + 0.5).floor() as i32
}

/// How the system picks its brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrightnessMode {
    /// Only ever read: the store holds a value this bridge doesn't know
    Unknown = 0,
    Automatic = 1,
    Manual = 2,
}

impl BrightnessMode {
    pub fn from_native(native: i32) -> BrightnessMode {
        match native {
            SCREEN_BRIGHTNESS_MODE_AUTOMATIC => BrightnessMode::Automatic,
            SCREEN_BRIGHTNESS_MODE_MANUAL => BrightnessMode::Manual,
            _ => BrightnessMode::Unknown,
        }
    }

    /// `None` for [BrightnessMode::Unknown], which can't be written
    pub fn to_native(self) -> Option<i32> {
        match self {
            BrightnessMode::Unknown => None,
            BrightnessMode::Automatic => Some(SCREEN_BRIGHTNESS_MODE_AUTOMATIC),
            BrightnessMode::Manual => Some(SCREEN_BRIGHTNESS_MODE_MANUAL),
        }
    }

    /// Decode a requested mode. Codes other than 0 and 1 fall back to manual.
    pub fn from_code(code: i64) -> BrightnessMode {
        match code {
            0 => BrightnessMode::Unknown,
            1 => BrightnessMode::Automatic,
            _ => BrightnessMode::Manual,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Whether the write-settings permission is held.
///
/// There is no denied state, the user can always be sent to the settings
/// screen again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Prompt,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Prompt => write!(f, "prompt"),
        }
    }
}
