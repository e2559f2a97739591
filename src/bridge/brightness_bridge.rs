use super::{
    error::BridgeError,
    types::{
        clamp_brightness, native_to_normalized, normalized_to_native, BrightnessMode,
        PermissionState, DEFAULT_BRIGHTNESS,
    },
};
use crate::external::{
    system_settings::{SettingKey, SettingsError, SystemSettings, SCREEN_BRIGHTNESS_MODE_MANUAL},
    ui_context::UiContext,
    window::WindowBrightnessStore,
};
use anyhow::Result;

/// Mediates between a calling application and the two brightness stores:
/// the override of the foreground window and the system-wide settings.
///
/// Every call validates its input, touches one store and returns. The only
/// state of its own is the brightness in effect before the first window
/// override, which lives until the override is dropped again with
/// [BrightnessBridge::restore_system_brightness].
pub struct BrightnessBridge<W: WindowBrightnessStore, S: SystemSettings, U: UiContext> {
    window: W,
    settings: S,
    ui: U,
    saved_brightness: Option<f64>,
}

impl<W: WindowBrightnessStore, S: SystemSettings, U: UiContext> BrightnessBridge<W, S, U> {
    pub fn new(window: W, settings: S, ui: U) -> BrightnessBridge<W, S, U> {
        BrightnessBridge {
            window,
            settings,
            ui,
            saved_brightness: None,
        }
    }

    /// The brightness in effect before the first override since creation or
    /// the last restore, if it could be read.
    pub fn saved_brightness(&self) -> Option<f64> {
        self.saved_brightness
    }

    /// The brightness the window currently shows, in 0.0..=1.0.
    pub async fn get_brightness(&self) -> Result<f64, BridgeError> {
        self.effective_brightness()
            .await
            .map_err(|e| BridgeError::platform("Failed to get brightness", e))
    }

    /// Override the brightness of the foreground window only.
    pub async fn set_brightness(&mut self, brightness: Option<f64>) -> Result<(), BridgeError> {
        let brightness = clamp_brightness(require_brightness(brightness)?);
        if self.saved_brightness.is_none() {
            match self.effective_brightness().await {
                Ok(current) => self.saved_brightness = Some(current),
                Err(e) => log::warn!("Couldn't save brightness before override: {}", e),
            }
        }
        log::debug!("Overriding window brightness with {}", brightness);
        let window = self.window.clone();
        self.ui
            .run_on_ui(Box::new(move || {
                window.set_override_brightness(Some(brightness))
            }))
            .await
            .map_err(|e| BridgeError::platform("Failed to set brightness", e))
    }

    pub async fn get_system_brightness(&self) -> Result<f64, BridgeError> {
        let native = self
            .settings
            .get_int(SettingKey::ScreenBrightness)
            .await
            .map_err(|e| BridgeError::from_settings("Failed to get system brightness", e))?;
        Ok(native_to_normalized(native))
    }

    /// Write the system-wide brightness, switching the system to manual mode
    /// first.
    ///
    /// The two writes are separate; if the second fails the mode stays
    /// manual while the brightness is unchanged.
    pub async fn set_system_brightness(
        &self,
        brightness: Option<f64>,
    ) -> Result<(), BridgeError> {
        let brightness = require_brightness(brightness)?;
        self.require_write_permission().await?;
        let native = normalized_to_native(brightness);
        log::debug!("Setting system brightness to {}", native);
        self.settings
            .put_int(
                SettingKey::ScreenBrightnessMode,
                SCREEN_BRIGHTNESS_MODE_MANUAL,
            )
            .await
            .map_err(|e| BridgeError::from_settings("Failed to set system brightness", e))?;
        self.settings
            .put_int(SettingKey::ScreenBrightness, native)
            .await
            .map_err(|e| BridgeError::from_settings("Failed to set system brightness", e))
    }

    // Reading the mode doesn't need the write permission, but hosts have
    // always been denied without it.
    pub async fn get_system_brightness_mode(&self) -> Result<BrightnessMode, BridgeError> {
        self.require_write_permission().await?;
        let native = self
            .settings
            .get_int(SettingKey::ScreenBrightnessMode)
            .await
            .map_err(|e| BridgeError::from_settings("Failed to get brightness mode", e))?;
        Ok(BrightnessMode::from_native(native))
    }

    pub async fn set_system_brightness_mode(
        &self,
        mode: Option<BrightnessMode>,
    ) -> Result<(), BridgeError> {
        let mode = mode.ok_or_else(|| BridgeError::invalid_argument("mode is required"))?;
        let native = mode.to_native().ok_or_else(|| {
            BridgeError::invalid_argument("Cannot set brightness mode to UNKNOWN")
        })?;
        self.require_write_permission().await?;
        log::debug!("Setting system brightness mode to {:?}", mode);
        self.settings
            .put_int(SettingKey::ScreenBrightnessMode, native)
            .await
            .map_err(|e| BridgeError::from_settings("Failed to set brightness mode", e))
    }

    /// True when the window has no override and follows the system.
    pub fn is_using_system_brightness(&self) -> Result<bool, BridgeError> {
        let current = self
            .window
            .override_brightness()
            .map_err(|e| BridgeError::platform("Failed to check brightness mode", e))?;
        Ok(current.is_none())
    }

    /// Drop the window override and forget the saved brightness.
    pub async fn restore_system_brightness(&mut self) -> Result<(), BridgeError> {
        let window = self.window.clone();
        self.ui
            .run_on_ui(Box::new(move || window.set_override_brightness(None)))
            .await
            .map_err(|e| BridgeError::platform("Failed to restore system brightness", e))?;
        log::debug!("Window brightness follows the system again");
        self.saved_brightness = None;
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        true
    }

    pub async fn check_permissions(&self) -> PermissionState {
        match self.settings.can_write().await {
            Ok(true) => PermissionState::Granted,
            Ok(false) => PermissionState::Prompt,
            Err(e) => {
                log::warn!("Couldn't query write-settings permission: {}", e);
                PermissionState::Prompt
            }
        }
    }

    /// Send the user to the settings screen unless the permission is held.
    ///
    /// Returns [PermissionState::Prompt] right after launching the screen.
    /// The grant can only be observed by calling
    /// [BrightnessBridge::check_permissions] later.
    pub async fn request_permissions(&self) -> PermissionState {
        if self.check_permissions().await == PermissionState::Granted {
            return PermissionState::Granted;
        }
        log::info!("Opening write-settings screen");
        if let Err(e) = self.settings.open_write_settings().await {
            log::warn!("Couldn't open write-settings screen: {}", e);
        }
        PermissionState::Prompt
    }

    pub fn get_plugin_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    async fn effective_brightness(&self) -> Result<f64> {
        if let Some(brightness) = self.window.override_brightness()? {
            return Ok(brightness);
        }
        match self.settings.get_int(SettingKey::ScreenBrightness).await {
            Ok(native) => Ok(native_to_normalized(native)),
            Err(SettingsError::NotFound(_)) => Ok(DEFAULT_BRIGHTNESS),
            Err(SettingsError::Platform(e)) => Err(e),
        }
    }

    async fn require_write_permission(&self) -> Result<(), BridgeError> {
        let granted = self
            .settings
            .can_write()
            .await
            .map_err(|e| BridgeError::platform("Failed to check write permission", e))?;
        if granted {
            Ok(())
        } else {
            Err(BridgeError::PermissionDenied)
        }
    }
}

fn require_brightness(brightness: Option<f64>) -> Result<f64, BridgeError> {
    match brightness {
        None => Err(BridgeError::invalid_argument("brightness is required")),
        Some(b) if b.is_nan() => Err(BridgeError::invalid_argument(
            "brightness must be a number",
        )),
        Some(b) => Ok(b),
    }
}
