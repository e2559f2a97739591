use super::{
    state_file::SettingsState, SettingKey, SettingsError, SystemSettings, SCREEN_BRIGHTNESS_MAX,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use logind_zbus::session::SessionProxy;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use zbus;
use zbus::zvariant::ObjectPath;

/// A [SystemSettings] store backed by the kernel's /sys/class/backlight
/// device class.
///
/// Brightness is read directly from the filesystem but writing is mediated
/// via logind Session's SetBrightness method, to allow root-less brightness
/// setting. The kernel knows nothing about brightness modes or about a
/// write-settings grant, so these live in a TOML state file which the user
/// edits to grant the permission.
#[derive(Debug, Clone)]
pub struct BacklightSettings<'a> {
    device: String,
    device_path: PathBuf,
    max_brightness: u32,
    proxy: SessionProxy<'a>,
    state_file: PathBuf,
    opener: String,
}

impl<'a> BacklightSettings<'a> {
    /// Create a store for the device under /sys/class/backlight/{device}.
    ///
    /// `opener` is the program launched with the state file as its argument
    /// when the user is asked to grant the write-settings permission.
    pub async fn new(
        device: &str,
        connection: zbus::Connection,
        session_path: ObjectPath<'a>,
        state_file: PathBuf,
        opener: &str,
    ) -> Result<BacklightSettings<'a>> {
        let proxy = SessionProxy::builder(&connection)
            .path(session_path)?
            .build()
            .await?;

        let device_path = PathBuf::from(format!("/sys/class/backlight/{}", device));
        let max_brightness = read_number_from_file(&device_path.join("max_brightness"))
            .await
            .with_context(|| format!("Couldn't read maximum brightness of {}", device))?;
        if max_brightness == 0 {
            anyhow::bail!("Backlight {} reports a maximum brightness of 0", device);
        }
        Ok(BacklightSettings {
            device: device.to_string(),
            device_path,
            max_brightness,
            proxy,
            state_file,
            opener: opener.to_string(),
        })
    }

    async fn read_brightness(&self) -> Result<i32, SettingsError> {
        match read_number_from_file(&self.device_path.join("brightness")).await {
            Ok(raw) => Ok(raw_to_native(raw, self.max_brightness)),
            Err(e) if is_not_found(&e) => Err(SettingsError::NotFound(SettingKey::ScreenBrightness)),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_brightness(&self, value: i32) -> Result<(), SettingsError> {
        let raw = native_to_raw(value, self.max_brightness);
        log::debug!("Setting {} backlight to {}", self.device, raw);
        self.proxy
            .set_brightness("backlight", &self.device, raw)
            .await
            .context("logind refused to set brightness")?;
        Ok(())
    }
}

#[async_trait]
impl SystemSettings for BacklightSettings<'static> {
    async fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError> {
        match key {
            SettingKey::ScreenBrightness => self.read_brightness().await,
            SettingKey::ScreenBrightnessMode => SettingsState::load(&self.state_file)
                .await?
                .brightness_mode
                .ok_or(SettingsError::NotFound(key)),
        }
    }

    async fn put_int(&self, key: SettingKey, value: i32) -> Result<(), SettingsError> {
        match key {
            SettingKey::ScreenBrightness => self.write_brightness(value).await,
            SettingKey::ScreenBrightnessMode => {
                let mut state = SettingsState::load(&self.state_file).await?;
                state.brightness_mode = Some(value);
                state.store(&self.state_file).await?;
                Ok(())
            }
        }
    }

    async fn can_write(&self) -> Result<bool> {
        Ok(SettingsState::load(&self.state_file).await?.write_settings)
    }

    async fn open_write_settings(&self) -> Result<()> {
        if fs::metadata(&self.state_file).await.is_err() {
            SettingsState::default().store(&self.state_file).await?;
        }
        log::info!(
            "Set write_settings = true in {} to allow system brightness changes",
            self.state_file.display()
        );
        tokio::process::Command::new(&self.opener)
            .arg(&self.state_file)
            .spawn()
            .with_context(|| format!("Couldn't launch {}", self.opener))?;
        Ok(())
    }
}

/// Scale a raw backlight value into the native 0..=255 range
pub fn raw_to_native(raw: u32, max_brightness: u32) -> i32 {
    let scaled = raw.min(max_brightness) as f64 * SCREEN_BRIGHTNESS_MAX as f64
        / max_brightness as f64;
    scaled.round() as i32
}

/// Scale a native 0..=255 value into the device's raw range
pub fn native_to_raw(value: i32, max_brightness: u32) -> u32 {
    let clamped = value.clamp(0, SCREEN_BRIGHTNESS_MAX) as f64;
    (clamped * max_brightness as f64 / SCREEN_BRIGHTNESS_MAX as f64).round() as u32
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map_or(false, |io| io.kind() == ErrorKind::NotFound)
}

async fn read_number_from_file(path: &Path) -> Result<u32> {
    let contents = fs::read_to_string(path).await?;
    Ok(contents.trim().parse()?)
}
